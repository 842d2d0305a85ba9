// Training corpus: CSV ingestion and the job title → required skills index.

pub mod index;
pub mod ingest;
