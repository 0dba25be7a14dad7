use clap::{Parser, Subcommand};

/// Columbus Launcher - self-service application instances on Kubernetes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Defaults to `serve`
    #[command(subcommand)]
    pub mode: Option<Mode>,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
    /// Run the HTTP control surface
    Serve {
        /// API port (default: SERVER_PORT or 8080)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Start an application instance and wait for it to be provisioned
    Start {
        username: String,

        app_name: String,

        /// Container image to run
        #[arg(short, long)]
        image: String,

        /// OAuth client id passed to the container
        #[arg(long, requires = "client_secret")]
        client_id: Option<String>,

        /// OAuth client secret passed to the container
        #[arg(long, requires = "client_id")]
        client_secret: Option<String>,
    },

    /// Stop an application instance (storage is kept)
    Stop {
        username: String,

        app_name: String,
    },

    /// Show whether an application instance is running
    Status {
        username: String,

        app_name: String,
    },

    /// Delete the storage of an application instance
    DeleteStorage {
        username: String,

        app_name: String,

        /// Confirm deletion of the instance data
        #[arg(long)]
        yes: bool,
    },

    /// Count pods across the cluster
    Pods,
}
