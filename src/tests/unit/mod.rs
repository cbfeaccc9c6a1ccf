mod ingestion;
