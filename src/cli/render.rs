use std::io::{self, Write};

use anstyle::{AnsiColor, Effects, Style};

use crate::{
    batch::{BatchEvent, BatchResult},
    mailbox::MailboxRecord,
    roster::Page,
};

/// Terminal output, styled only when writing to a terminal.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    styled: bool,
}

impl Renderer {
    pub fn new(styled: bool) -> Self {
        Self { styled }
    }

    fn style(&self, style: Style) -> Style {
        if self.styled { style } else { Style::new() }
    }

    pub fn page(&self, page: &Page<'_>, out: &mut impl Write) -> io::Result<()> {
        if page.total_count == 0 {
            return writeln!(out, "no directory synced mailboxes");
        }

        let name_width = column_width(page.items, "Display name", |record| {
            record.display_name().chars().count()
        });
        let address_width = column_width(page.items, "Primary address", |record| {
            record.primary_address().chars().count()
        });
        let row_width = page.items.len().to_string().len().max(1);

        let header = self.style(Effects::BOLD.into());
        writeln!(
            out,
            "{header}{:>row_width$}  {:<name_width$}  {:<address_width$}  Managed in{header:#}",
            "#", "Display name", "Primary address",
        )?;
        for (index, record) in page.items.iter().enumerate() {
            let (style, managed) = if record.cloud_managed() {
                (AnsiColor::Cyan.on_default(), "cloud")
            } else {
                (AnsiColor::Yellow.on_default(), "on-prem")
            };
            let style = self.style(style);
            writeln!(
                out,
                "{:>row_width$}  {:<name_width$}  {:<address_width$}  {style}{managed}{style:#}",
                index + 1,
                record.display_name(),
                record.primary_address(),
            )?;
        }
        writeln!(
            out,
            "page {} of {} ({} mailboxes)",
            page.page_number, page.total_pages, page.total_count
        )
    }

    pub fn progress(&self, event: &BatchEvent, out: &mut impl Write) -> io::Result<()> {
        write!(
            out,
            "[{}/{}] {} ({}) ",
            event.position, event.total, event.display_name, event.principal_id
        )?;
        match &event.outcome {
            Ok(()) => {
                let ok = self.style(AnsiColor::Green.on_default());
                writeln!(out, "{ok}ok{ok:#}")
            }
            Err(error) => {
                let failed = self.style(AnsiColor::Red.on_default().effects(Effects::BOLD));
                writeln!(out, "{failed}failed{failed:#}: {error}")
            }
        }
    }

    pub fn summary(&self, result: &BatchResult, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{result}")?;
        for failure in &result.failures {
            writeln!(
                out,
                "  {} ({}): {}",
                failure.display_name, failure.principal_id, failure.error
            )?;
        }
        Ok(())
    }
}

fn column_width(
    records: &[MailboxRecord],
    title: &str,
    width: impl Fn(&MailboxRecord) -> usize,
) -> usize {
    records
        .iter()
        .map(width)
        .max()
        .unwrap_or_default()
        .max(title.len())
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use rstest::*;

    use super::*;
    use crate::{
        batch::BatchFailure,
        mailbox::{Intent, PrincipalId},
        roster::{Roster, tests::records},
    };

    fn render(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        assert_ok!(f(&mut out));
        assert_ok!(String::from_utf8(out))
    }

    #[fixture]
    fn renderer() -> Renderer {
        Renderer::new(false)
    }

    #[rstest]
    fn test_page_lists_rows_with_numbers(renderer: Renderer) {
        let mut roster = Roster::default();
        let mut mailboxes = records(2);
        mailboxes[1].set_cloud_managed(true);
        roster.replace(mailboxes);

        let output = render(|out| renderer.page(&roster.current(), out));
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(4, lines.len());
        assert_starts_with!(lines[0], "#  Display name");
        assert_starts_with!(lines[1], "1  User 0");
        assert_ends_with!(lines[1], "on-prem");
        assert_starts_with!(lines[2], "2  User 1");
        assert_ends_with!(lines[2], "cloud");
        assert_eq!("page 1 of 1 (2 mailboxes)", lines[3]);
    }

    #[rstest]
    fn test_page_reports_empty_roster(renderer: Renderer) {
        let roster = Roster::default();
        let output = render(|out| renderer.page(&roster.current(), out));
        assert_eq!("no directory synced mailboxes\n", output);
    }

    #[rstest]
    fn test_progress_shows_outcome(renderer: Renderer) {
        let event = BatchEvent {
            position: 2,
            total: 5,
            principal_id: assert_ok!(PrincipalId::try_from("id-2")),
            display_name: "User 2".to_string(),
            outcome: Err("access denied".to_string()),
        };
        let output = render(|out| renderer.progress(&event, out));
        assert_eq!("[2/5] User 2 (id-2) failed: access denied\n", output);
    }

    #[rstest]
    fn test_summary_lists_failures(renderer: Renderer) {
        let now = jiff::Timestamp::now();
        let result = BatchResult {
            intent: Intent::SetOnPremManaged,
            success_count: 1,
            failures: vec![BatchFailure {
                principal_id: assert_ok!(PrincipalId::try_from("id-9")),
                display_name: "User 9".to_string(),
                error: "not found".to_string(),
            }],
            started: now,
            finished: now,
        };
        let output = render(|out| renderer.summary(&result, out));
        assert_eq!(
            "1 of 2 mailboxes set to on-prem (1 failed) in 0.0s\n  User 9 (id-9): not found\n",
            output
        );
    }
}
