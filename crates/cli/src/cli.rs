use clap::{Args, Parser, Subcommand, ValueEnum};
use isard_provider::data_sources::medias::MediaFilter;
use isard_provider::data_sources::network_interfaces::{InterfaceFilter, InterfaceQuery};
use isard_provider::data_sources::users::UserFilter;
use isard_provider::isard::EntityKind;

#[derive(Debug, Parser)]
#[command(
    name = "isardctl",
    version,
    about = "Command-line front end for the IsardVDI provider core"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List templates visible to the current user.
    Templates {
        #[arg(long, help = "Case-insensitive substring of the template name")]
        name: Option<String>,
    },
    /// List users, optionally filtered.
    Users(UserArgs),
    /// List medias, optionally filtered.
    Medias(MediaArgs),
    /// List system network interfaces.
    Interfaces(InterfaceArgs),
    /// Print the current status of a desktop.
    DesktopStatus { id: String },
    /// Block until a desktop or deployment reaches a terminal status.
    WaitStopped {
        #[arg(value_enum)]
        kind: Kind,
        id: String,
        #[arg(long, help = "Wait budget in seconds, the configured stop timeout by default")]
        timeout: Option<u64>,
    },
    /// Delete a persistent desktop.
    DestroyDesktop {
        id: String,
        #[arg(long, help = "Stop the desktop and wait for it before deleting")]
        force_stop: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Kind {
    Desktop,
    Deployment,
}

impl From<Kind> for EntityKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Desktop => EntityKind::Desktop,
            Kind::Deployment => EntityKind::Deployment,
        }
    }
}

// -----------------------------------------------------------------------------

#[derive(Debug, Args)]
pub struct UserArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub category_id: Option<String>,
    #[arg(long)]
    pub group_id: Option<String>,
    #[arg(long, help = "admin, manager, advanced or user")]
    pub role: Option<String>,
    #[arg(long)]
    pub active: Option<bool>,
}

impl From<UserArgs> for UserFilter {
    fn from(args: UserArgs) -> Self {
        UserFilter {
            name: args.name,
            category_id: args.category_id,
            group_id: args.group_id,
            role: args.role,
            active: args.active,
        }
    }
}

#[derive(Debug, Args)]
pub struct MediaArgs {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long, help = "iso or floppy")]
    pub kind: Option<String>,
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long)]
    pub category_id: Option<String>,
    #[arg(long)]
    pub group_id: Option<String>,
    #[arg(long)]
    pub user_id: Option<String>,
}

impl From<MediaArgs> for MediaFilter {
    fn from(args: MediaArgs) -> Self {
        MediaFilter {
            name: args.name,
            kind: args.kind,
            status: args.status,
            category_id: args.category_id,
            group_id: args.group_id,
            user_id: args.user_id,
        }
    }
}

#[derive(Debug, Args)]
pub struct InterfaceArgs {
    #[arg(long, help = "Exact interface name, takes precedence over the filters")]
    pub name: Option<String>,
    #[arg(long, help = "Case-sensitive substring of the interface name")]
    pub name_contains: Option<String>,
    #[arg(long)]
    pub kind: Option<String>,
    #[arg(long)]
    pub net: Option<String>,
}

impl From<InterfaceArgs> for InterfaceQuery {
    fn from(args: InterfaceArgs) -> Self {
        let filter = InterfaceFilter {
            name: args.name_contains,
            kind: args.kind,
            net: args.net,
        };
        InterfaceQuery {
            name: args.name,
            filter: (filter != InterfaceFilter::default()).then_some(filter),
        }
    }
}
