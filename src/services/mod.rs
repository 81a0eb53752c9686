pub mod event_sink;
pub mod file_sink;
pub mod html_stripper;
pub mod keyword_counter;
pub mod quorum_filter;
pub mod section_formatter;
pub mod stats_aggregator;
pub mod text_normalizer;

pub use event_sink::{BatchEvent, EventLevel, EventSink, MemorySink, Stage, TracingSink};
pub use file_sink::{article_file_name, sanitize_title, FileSink};
pub use html_stripper::{HtmlStripper, ScraperStripper};
pub use keyword_counter::count_matches;
pub use quorum_filter::QuorumFilter;
pub use section_formatter::{render_article, render_corpus_entry, SectionFormatter};
pub use stats_aggregator::{
    compute_stats, render_document_block, render_final_block, LabelStats, StatsAccumulator,
};
pub use text_normalizer::TextNormalizer;
