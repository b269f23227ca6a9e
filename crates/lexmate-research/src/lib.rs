pub mod retrieval;
pub mod tavily;

pub use retrieval::ChromaRetriever;
pub use tavily::TavilySearcher;
