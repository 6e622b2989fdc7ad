use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "tg-cli")]
#[command(about = "Tile game configuration resolver")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Mode,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Mode {
    /// Evaluate the document root as a condition block.
    Condition(ConditionArgs),
    /// List the children of the document root that exist.
    Visit(VisitArgs),
    /// Resolve the owner named by the document root.
    Owner(OwnerArgs),
    /// Build a tile selector from the document root and test tiles.
    Select(SelectArgs),
}

#[derive(Debug, Args)]
pub(crate) struct SourceArgs {
    #[arg(long = "file")]
    pub(crate) file: String,
    #[arg(long = "prefs")]
    pub(crate) prefs: Option<String>,
    #[arg(long = "team", allow_negative_numbers = true)]
    pub(crate) team: Option<i32>,
    #[arg(long = "mate", allow_negative_numbers = true)]
    pub(crate) mate: Option<i32>,
}

#[derive(Debug, Args)]
pub(crate) struct ConditionArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,
}

#[derive(Debug, Args)]
pub(crate) struct VisitArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,
    #[arg(long = "name")]
    pub(crate) name: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct OwnerArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,
    #[arg(long = "require", value_enum)]
    pub(crate) require: Option<RequiredOwner>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum RequiredOwner {
    Game,
    Team,
    Player,
}

#[derive(Debug, Args)]
pub(crate) struct SelectArgs {
    #[command(flatten)]
    pub(crate) source: SourceArgs,
    /// A `<Tile .../>` element; may be repeated.
    #[arg(long = "tile")]
    pub(crate) tiles: Vec<String>,
    #[arg(long = "skin", default_value_t = -1, allow_negative_numbers = true)]
    pub(crate) skin: i32,
    /// Combine the root's items with a logical and.
    #[arg(long = "all")]
    pub(crate) all: bool,
}
