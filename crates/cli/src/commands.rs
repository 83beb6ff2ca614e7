use clap::{Args, Subcommand};

#[derive(Subcommand)]
pub enum Commands {
    /// Filter a JSON array of records
    Query {
        #[command(flatten)]
        search: SearchArgs,

        #[arg(long, help = "JSON file holding an array of record objects")]
        records: String,

        #[arg(
            long,
            help = "If specified, writes the matching records to this file instead of stdout"
        )]
        output: Option<String>,
    },
    /// Render the SQL statement a query compiles to
    Sql {
        #[command(flatten)]
        search: SearchArgs,

        #[arg(long, help = "Table to select from; defaults to the config entity")]
        table: Option<String>,

        /// SQL dialect: "postgres" (or "pg") or "mysql"
        #[arg(long, default_value = "postgres")]
        dialect: String,
    },
    /// Print the predicate tree a query compiles to
    Explain {
        #[command(flatten)]
        search: SearchArgs,
    },
    /// Print the parse tree of a query as JSON
    Ast {
        #[arg(long, short, help = "Query string")]
        query: String,
    },
    /// List the searchable fields declared in a config file
    Fields {
        #[arg(long, help = "Search config file path")]
        config: String,
    },
}

#[derive(Args)]
pub struct SearchArgs {
    #[arg(long, help = "Search config file path")]
    pub config: String,

    #[arg(long, short, help = "Query string")]
    pub query: String,

    /// Comma-separated allow-list of field names; all fields when omitted
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    #[arg(long, help = "Fail on unknown field keys instead of matching nothing")]
    pub strict: bool,

    /// Reference time for relative dates (RFC 3339); defaults to now
    #[arg(long)]
    pub now: Option<String>,
}
