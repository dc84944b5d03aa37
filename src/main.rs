mod batch;
mod cli;
mod config;
mod console;
mod exchange;
mod logging;
mod mailbox;
mod roster;
mod service;

use std::{num::NonZeroUsize, path::PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use console::Console;
use exchange::ExchangeOnline;
use mailbox::{Intent, PrincipalId};

/// Switch directory synced Exchange Online mailboxes between cloud and
/// on-premises management.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Config file, defaults to $XDG_CONFIG_HOME/mailflip/config.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tenant section of the config file to use
    #[arg(short, long)]
    tenant: Option<String>,

    /// Mailboxes shown per page
    #[arg(long)]
    page_size: Option<NonZeroUsize>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Default, Clone, PartialEq, Eq)]
pub enum Command {
    /// Browse and convert mailboxes at a prompt
    #[default]
    Interactive,
    /// Print one page of directory synced mailboxes
    List {
        #[arg(short, long, default_value_t = 1)]
        page: usize,
        /// Print the whole roster as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the given mailboxes to one management mode
    Convert {
        /// cloud or on-prem
        #[arg(long)]
        to: Intent,
        /// Principal ids (object GUIDs) of the mailboxes
        #[arg(required = true)]
        ids: Vec<PrincipalId>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load_from_file(args.config)?;
    if let Some(page_size) = args.page_size {
        config.override_page_size(page_size);
    }
    let (tenant_name, tenant) = config.tenant(args.tenant.as_deref())?;
    logging::init(Some(tenant_name));

    let service = ExchangeOnline::new(config.shell().clone(), tenant.clone());
    let mut console = Console::new(service, config.page_size());

    cli::run(args.command.unwrap_or_default(), &mut console).await
}
