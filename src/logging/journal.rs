use std::{env, os::fd::AsFd as _};

/// Whether stderr is the stream systemd handed us for the journal.
///
/// `$JOURNAL_STREAM` holds `<device>:<inode>` of that stream.
pub fn stderr_is_journal() -> bool {
    let Some(stream) = env::var_os("JOURNAL_STREAM") else {
        return false;
    };
    let Some((device, inode)) = stream.to_str().and_then(parse_stream) else {
        return false;
    };
    rustix::fs::fstat(std::io::stderr().as_fd()).is_ok_and(|stat| {
        u64::try_from(stat.st_dev).ok() == Some(device)
            && u64::try_from(stat.st_ino).ok() == Some(inode)
    })
}

fn parse_stream(stream: &str) -> Option<(u64, u64)> {
    let (device, inode) = stream.split_once(':')?;
    Some((device.parse().ok()?, inode.parse().ok()?))
}
