//! The contract between the mention tracker and a span-marker encoder.

/// Receives the open/close marker events the tracker determines for one
/// token at a time.
///
/// For every token the tracker calls, in this order and exactly once:
/// [`begin_markers`](MarkerConsumer::begin_markers), then zero or more of
/// [`open_mention`](MarkerConsumer::open_mention) /
/// [`close_mention`](MarkerConsumer::close_mention) /
/// [`open_and_close_mention`](MarkerConsumer::open_and_close_mention), then
/// [`end_markers`](MarkerConsumer::end_markers). The bracketing calls are
/// made even when the marker batch is empty, so an encoder can render an
/// explicit "no markers" placeholder.
///
/// Errors returned by an implementation are relayed to the caller of the
/// tracker untouched; the tracker itself never fails.
pub trait MarkerConsumer {
    type Error;

    /// Starts the marker batch for the current token.
    fn begin_markers(&mut self) -> Result<(), Self::Error>;

    /// A mention of `entity_id` starts at the current token and ends at a
    /// later one.
    fn open_mention(&mut self, entity_id: &str) -> Result<(), Self::Error>;

    /// A mention of `entity_id` started at an earlier token and ends at
    /// the current one.
    fn close_mention(&mut self, entity_id: &str) -> Result<(), Self::Error>;

    /// A mention of `entity_id` covers only the current token.
    fn open_and_close_mention(&mut self, entity_id: &str) -> Result<(), Self::Error>;

    /// Finishes the marker batch for the current token.
    fn end_markers(&mut self) -> Result<(), Self::Error>;
}
