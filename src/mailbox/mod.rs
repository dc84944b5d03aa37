mod intent;
mod principal_id;
mod record;

pub use intent::Intent;
pub use principal_id::PrincipalId;
pub use record::MailboxRecord;
