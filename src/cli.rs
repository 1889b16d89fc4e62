use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "yt",
    version,
    about = "Search YouTube, pick results by number and play them with mpv",
    long_about = "Interactive search-and-play loop. Type a query, pick results by number \
                  (e.g. 1, 2, 5), 'n' for the next page or 'r' to search again. \
                  Type 'tui' at the query prompt to toggle boxed output and 'exit' at any \
                  prompt to quit."
)]
pub struct Cli {}
