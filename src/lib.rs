pub mod aligner;
pub mod annotations;
pub mod conll;
pub mod consumer;
pub mod diagnostics;
pub mod mention;
pub mod pipeline;
pub mod report;
pub mod tracker;

// Re-export main types for convenient access
pub use aligner::Aligner;
pub use annotations::DocumentAnnotations;
pub use conll::Conll2012Writer;
pub use consumer::MarkerConsumer;
pub use diagnostics::{
    CollectingSink, Diagnostic, DiagnosticFormatter, DiagnosticSink, TracingSink,
};
pub use mention::{Entity, Mention, TokenSpan};
pub use pipeline::{convert_document, AlignmentFailure, AlignmentFailureKind, PipelineOutcome};
pub use report::entity_report;
pub use tracker::MentionTracker;
