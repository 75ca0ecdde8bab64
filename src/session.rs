use crate::gateway::AiError;
use crate::models::analysis::AiAnalysis;

/// Lifecycle of one in-flight gateway request.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestState<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        RequestState::Idle
    }
}

impl<T> RequestState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, RequestState::Loading)
    }
}

/// A finished per-ticket analysis, tagged with the ticket it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketAnalysis {
    pub ticket_id: String,
    pub analysis: AiAnalysis,
}

/// Transient analysis state a UI layer renders from. The per-ticket request
/// and the collection-wide insights request load independently and never
/// block each other.
///
/// There is no cancellation: an in-flight request runs to completion, and a
/// generation token decides whether its result is still wanted. Dismissing
/// or superseding a view bumps the generation, so a stale completion is
/// dropped with no observable effect.
#[derive(Debug, Default)]
pub struct AnalysisSession {
    ticket_analysis: RequestState<TicketAnalysis>,
    insights: RequestState<String>,
    analysis_generation: u64,
    insights_generation: u64,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ticket_analysis(&self) -> &RequestState<TicketAnalysis> {
        &self.ticket_analysis
    }

    pub fn insights(&self) -> &RequestState<String> {
        &self.insights
    }

    /// Mark a per-ticket request in flight. The returned token must be
    /// presented on completion; older tokens are stale.
    pub fn begin_analysis(&mut self) -> u64 {
        self.analysis_generation += 1;
        self.ticket_analysis = RequestState::Loading;
        self.analysis_generation
    }

    /// Record the outcome of a per-ticket request. Stale tokens are ignored.
    pub fn finish_analysis(
        &mut self,
        token: u64,
        ticket_id: &str,
        outcome: Result<AiAnalysis, AiError>,
    ) {
        if token != self.analysis_generation {
            return;
        }
        self.ticket_analysis = match outcome {
            Ok(analysis) => RequestState::Ready(TicketAnalysis {
                ticket_id: ticket_id.to_string(),
                analysis,
            }),
            Err(e) => RequestState::Failed(e.to_string()),
        };
    }

    /// Close the analysis view; whatever is still in flight gets discarded.
    pub fn dismiss_analysis(&mut self) {
        self.analysis_generation += 1;
        self.ticket_analysis = RequestState::Idle;
    }

    pub fn begin_insights(&mut self) -> u64 {
        self.insights_generation += 1;
        self.insights = RequestState::Loading;
        self.insights_generation
    }

    pub fn finish_insights(&mut self, token: u64, outcome: Result<String, AiError>) {
        if token != self.insights_generation {
            return;
        }
        self.insights = match outcome {
            Ok(text) => RequestState::Ready(text),
            Err(e) => RequestState::Failed(e.to_string()),
        };
    }

    pub fn dismiss_insights(&mut self) {
        self.insights_generation += 1;
        self.insights = RequestState::Idle;
    }
}
