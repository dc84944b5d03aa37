mod journal;

use std::{
    io::{self, Write},
    time::SystemTime,
};

use anstyle::{AnsiColor, Effects, Style};
use env_logger::Env;
use jiff::Timestamp;
use journal::stderr_is_journal;
use log::{Level, Record};

/// Installs the global logger. Lines carry the tenant name when one is given.
pub fn init(tenant: Option<&str>) {
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    let tenant = tenant.map(str::to_string);
    if stderr_is_journal() {
        builder.format(move |buf, record| journal_line(buf, tenant.as_deref(), record));
    } else {
        builder.format(move |buf, record| {
            let now = Timestamp::try_from(SystemTime::now()).ok();
            terminal_line(buf, tenant.as_deref(), now, record)
        });
    }
    builder.init();
}

/// Syslog priority used for journal lines.
fn priority(level: Level) -> u8 {
    match level {
        Level::Error => 3,
        Level::Warn => 4,
        Level::Info => 6,
        Level::Debug | Level::Trace => 7,
    }
}

fn level_style(level: Level) -> Style {
    match level {
        Level::Error => AnsiColor::Red.on_default().effects(Effects::BOLD),
        Level::Warn => AnsiColor::Yellow.on_default(),
        Level::Info => AnsiColor::Green.on_default(),
        Level::Debug => AnsiColor::Blue.on_default(),
        Level::Trace => AnsiColor::Cyan.on_default(),
    }
}

/// The journal stamps lines itself, so only priority, tenant and target go in.
fn journal_line(
    out: &mut impl Write,
    tenant: Option<&str>,
    record: &Record<'_>,
) -> io::Result<()> {
    write!(out, "<{}>", priority(record.level()))?;
    if let Some(tenant) = tenant {
        write!(out, "{tenant} ")?;
    }
    writeln!(out, "{}: {}", record.target(), record.args())
}

fn terminal_line(
    out: &mut impl Write,
    tenant: Option<&str>,
    now: Option<Timestamp>,
    record: &Record<'_>,
) -> io::Result<()> {
    let subtle = AnsiColor::BrightBlack.on_default();
    let level = level_style(record.level());
    write!(out, "{subtle}[{subtle:#}")?;
    match now {
        Some(now) => write!(out, "{now:.3} ")?,
        None => write!(out, "timestamp_error ")?,
    }
    write!(out, "{level}{}{level:#} ", record.level())?;
    if let Some(tenant) = tenant {
        write!(out, "{tenant} ")?;
    }
    write!(out, "{}", record.target())?;
    if let Some(line) = record.line() {
        write!(out, ":{line}")?;
    }
    writeln!(out, "{subtle}]{subtle:#} {}", record.args())
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;

    fn with_record<T>(level: Level, f: impl FnOnce(&Record<'_>) -> T) -> T {
        f(&Record::builder()
            .args(format_args!("loaded 3 mailboxes"))
            .level(level)
            .target("mailflip::console")
            .line(Some(42))
            .build())
    }

    #[rstest]
    #[case(Level::Error, 3)]
    #[case(Level::Warn, 4)]
    #[case(Level::Info, 6)]
    #[case(Level::Debug, 7)]
    #[case(Level::Trace, 7)]
    fn test_levels_map_to_syslog_priorities(#[case] level: Level, #[case] expected: u8) {
        assert_eq!(expected, priority(level));
    }

    #[rstest]
    #[case(Some("contoso"), "<4>contoso mailflip::console: loaded 3 mailboxes\n")]
    #[case(None, "<4>mailflip::console: loaded 3 mailboxes\n")]
    fn test_journal_line(#[case] tenant: Option<&str>, #[case] expected: &str) {
        let mut out = Vec::new();
        assert_ok!(with_record(Level::Warn, |record| journal_line(&mut out, tenant, record)));
        assert_eq!(expected, assert_ok!(String::from_utf8(out)));
    }

    #[rstest]
    fn test_terminal_line_carries_time_tenant_and_location() {
        let now: Timestamp = assert_ok!("2026-10-18T08:30:00Z".parse());
        let mut out = Vec::new();
        assert_ok!(with_record(Level::Info, |record| {
            terminal_line(&mut out, Some("contoso"), Some(now), record)
        }));

        let line = assert_ok!(String::from_utf8(out));
        assert_contains!(line, "2026-10-18T08:30:00.000Z ");
        assert_contains!(line, "contoso mailflip::console:42");
        assert_ends_with!(line, " loaded 3 mailboxes\n");
    }

    #[rstest]
    fn test_terminal_line_without_clock() {
        let mut out = Vec::new();
        assert_ok!(with_record(Level::Error, |record| {
            terminal_line(&mut out, None, None, record)
        }));

        let line = assert_ok!(String::from_utf8(out));
        assert_contains!(line, "timestamp_error ");
        assert_contains!(line, &format!("{}ERROR", level_style(Level::Error)));
    }
}
