use anyhow::Result;
use tracing::{debug, warn};

use super::playback::{PlaybackSink, play_all};
use super::presentation::{ModeStore, PresentationMode};
use super::prompt::{FAREWELL, Prompt, Prompter, Reply};
use super::provider::{FetchOutcome, SearchProvider, fetch_page};
use super::results::Pager;
use super::selection::parse_selection;

pub(crate) const TOGGLE_SENTINEL: &str = "tui";

pub(crate) const STARTUP_MESSAGE: &str = "All dependencies are satisfied. Running the app...";
pub(crate) const QUERY_PROMPT: &str = "Type the query (or 'tui' to toggle UI):";
pub(crate) const SELECTION_PROMPT: &str = "Enter the numbers of the videos to select (e.g., 1, 2, 5), 'n' for next page, or 'r' to redo search:";
pub(crate) const POST_PLAY_PROMPT: &str = "Would you like to see the list again or perform another search? (l: list, s: search, q: quit):";
pub(crate) const TOGGLE_PROMPT: &str = "Set boxed UI to 1 (on) or 0 (off):";
pub(crate) const NO_RESULTS: &str = "No videos found for this page.";
pub(crate) const NOTHING_SELECTED: &str = "No valid numbers selected.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum State {
    AwaitingQuery,
    /// `refetch: false` re-renders the page already held by the pager.
    ShowingResults { refetch: bool },
    AwaitingSelection,
    Playing(Vec<String>),
    PostPlayMenu,
    Terminated,
}

pub(crate) struct Session<P, S, K, M> {
    prompter: Prompter<P>,
    provider: S,
    sink: K,
    store: M,
    page_size: usize,
    pager: Pager,
}

impl<P, S, K, M> Session<P, S, K, M>
where
    P: Prompt,
    S: SearchProvider,
    K: PlaybackSink,
    M: ModeStore,
{
    pub(crate) fn new(
        prompter: Prompter<P>,
        provider: S,
        sink: K,
        store: M,
        page_size: usize,
    ) -> Self {
        Self {
            prompter,
            provider,
            sink,
            store,
            page_size: page_size.max(1),
            pager: Pager::default(),
        }
    }

    pub(crate) fn run(&mut self) -> Result<()> {
        self.prompter.say(STARTUP_MESSAGE)?;
        let mut state = State::AwaitingQuery;
        while state != State::Terminated {
            state = self.step(state)?;
            debug!(?state, page = self.pager.page(), "session transition");
        }
        Ok(())
    }

    pub(crate) fn step(&mut self, state: State) -> Result<State> {
        match state {
            State::AwaitingQuery => self.await_query(),
            State::ShowingResults { refetch } => self.show_results(refetch),
            State::AwaitingSelection => self.await_selection(),
            State::Playing(addresses) => self.play(&addresses),
            State::PostPlayMenu => self.post_play_menu(),
            State::Terminated => Ok(State::Terminated),
        }
    }

    #[cfg(test)]
    pub(crate) fn pager(&self) -> &Pager {
        &self.pager
    }

    #[cfg(test)]
    pub(crate) fn mode(&self) -> PresentationMode {
        self.prompter.mode()
    }

    /// Prompts once. `None` means the user quit and the farewell was shown.
    fn ask(&mut self, message: &str) -> Result<Option<String>> {
        match self.prompter.ask(message)? {
            Reply::Line(line) => Ok(Some(line)),
            Reply::Quit => {
                self.prompter.say(FAREWELL)?;
                Ok(None)
            }
        }
    }

    fn await_query(&mut self) -> Result<State> {
        let Some(line) = self.ask(QUERY_PROMPT)? else {
            return Ok(State::Terminated);
        };
        let query = line.trim();
        if query.is_empty() {
            self.prompter.say("Please type something to search for.")?;
            return Ok(State::AwaitingQuery);
        }
        if query.eq_ignore_ascii_case(TOGGLE_SENTINEL) {
            return self.toggle_presentation();
        }
        self.pager.new_search(query);
        Ok(State::ShowingResults { refetch: true })
    }

    fn toggle_presentation(&mut self) -> Result<State> {
        let Some(answer) = self.ask(TOGGLE_PROMPT)? else {
            return Ok(State::Terminated);
        };
        let Some(mode) = PresentationMode::from_toggle_answer(&answer) else {
            self.prompter.say("Invalid input. UI mode not changed.")?;
            return Ok(State::AwaitingQuery);
        };

        self.prompter.set_mode(mode);
        if let Err(err) = self.store.set_mode(mode) {
            let detail = format!("{err:#}");
            warn!(error = %detail, %mode, "failed to persist presentation mode");
            self.prompter
                .say(&format!("Could not save UI mode for next time: {detail}"))?;
        }
        let label = match mode {
            PresentationMode::Boxed => "on",
            PresentationMode::Plain => "off",
        };
        self.prompter.say(&format!("Boxed UI is now {label}."))?;
        Ok(State::AwaitingQuery)
    }

    fn show_results(&mut self, refetch: bool) -> Result<State> {
        if !refetch {
            if let Some(results) = self.pager.results() {
                let listing = results.listing();
                self.prompter.say(&listing)?;
                return Ok(State::AwaitingSelection);
            }
        }

        let Some(query) = self.pager.query().map(str::to_string) else {
            return Ok(State::AwaitingQuery);
        };
        let page = self.pager.page();
        match fetch_page(&self.provider, &query, self.page_size, page) {
            Ok(FetchOutcome::Page(results)) => {
                debug!(query = results.query(), page = results.page(), shown = results.len(), "page fetched");
                let listing = results.listing();
                self.pager.install(results);
                self.prompter.say(&listing)?;
                Ok(State::AwaitingSelection)
            }
            Ok(FetchOutcome::Empty) => {
                self.prompter.say(NO_RESULTS)?;
                self.pager.abandon();
                Ok(State::AwaitingQuery)
            }
            Err(err) => {
                let detail = format!("{err:#}");
                warn!(query = %query, page, error = %detail, "search failed");
                self.prompter.say(&format!("Search failed: {detail}"))?;
                self.pager.abandon();
                Ok(State::AwaitingQuery)
            }
        }
    }

    fn await_selection(&mut self) -> Result<State> {
        let Some(line) = self.ask(SELECTION_PROMPT)? else {
            return Ok(State::Terminated);
        };
        let command = line.trim();
        if command.eq_ignore_ascii_case("n") {
            self.pager.next_page();
            return Ok(State::ShowingResults { refetch: true });
        }
        if command.eq_ignore_ascii_case("r") {
            self.pager.redo();
            return Ok(State::AwaitingQuery);
        }

        let result_count = self.pager.results().map_or(0, |results| results.len());
        let selection = match parse_selection(command, result_count) {
            Ok(selection) => selection,
            Err(err) => {
                self.prompter.say(&format!(
                    "Please enter valid numbers separated by commas ({err})."
                ))?;
                return Ok(State::AwaitingSelection);
            }
        };
        if selection.is_empty() {
            self.prompter.say(NOTHING_SELECTED)?;
            return Ok(State::AwaitingSelection);
        }

        let addresses = selection
            .indices()
            .iter()
            .filter_map(|&index| self.pager.resolve(index))
            .map(str::to_string)
            .collect();
        Ok(State::Playing(addresses))
    }

    fn play(&mut self, addresses: &[String]) -> Result<State> {
        let report = play_all(&mut self.sink, addresses);
        for failure in &report.failures {
            self.prompter.say(&format!(
                "Could not play {}: {}",
                failure.address, failure.detail
            ))?;
        }
        debug!(played = report.played, failed = report.failures.len(), "playback finished");
        Ok(State::PostPlayMenu)
    }

    fn post_play_menu(&mut self) -> Result<State> {
        let Some(line) = self.ask(POST_PLAY_PROMPT)? else {
            return Ok(State::Terminated);
        };
        match line.trim().to_ascii_lowercase().as_str() {
            "l" => Ok(State::ShowingResults { refetch: false }),
            "s" => {
                self.pager.redo();
                Ok(State::AwaitingQuery)
            }
            "q" => {
                self.prompter.say("Goodbye!")?;
                Ok(State::Terminated)
            }
            _ => {
                self.prompter.say("Please answer l, s or q.")?;
                Ok(State::PostPlayMenu)
            }
        }
    }
}
