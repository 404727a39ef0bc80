use clap::Args;
use serde::Serialize;
use serde_json::{json, Value};

use navsim_core::nav::{search_schemes, SchemeSummary};

use crate::source::{self, ProviderArgs};

/// Rows shown when `--limit` is not given
const DEFAULT_LIMIT: usize = 25;

/// Arguments for a scheme search
#[derive(Args)]
pub struct SearchArgs {
    /// Words to look for in scheme names, or an exact scheme code
    #[arg(default_value = "")]
    pub query: String,

    /// Maximum rows returned
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: usize,

    /// Saved scheme list (`/mf` JSON) to search instead of fetching it
    #[arg(long)]
    pub list_file: Option<String>,
}

#[derive(Debug, Serialize)]
struct SchemeSearch {
    query: String,
    total_matches: usize,
    count: usize,
    schemes: Vec<SchemeSummary>,
}

pub fn run_search(
    args: SearchArgs,
    cfg: &ProviderArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let list = source::load_scheme_list(args.list_file.as_deref(), cfg)?;
    let search = paginate(&args.query, search_schemes(&list, &args.query), args.limit);
    let mut output = json!({
        "methodology": "Case-insensitive scheme name match, or exact scheme code",
    });
    output["result"] = serde_json::to_value(search)?;
    Ok(output)
}

fn paginate(query: &str, mut matches: Vec<SchemeSummary>, limit: usize) -> SchemeSearch {
    let total_matches = matches.len();
    matches.truncate(limit);
    SchemeSearch {
        query: query.trim().to_string(),
        total_matches,
        count: matches.len(),
        schemes: matches,
    }
}
