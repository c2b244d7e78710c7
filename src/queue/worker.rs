use crate::api::service::ServiceClient;
use crate::api::transport::HttpTransport;
use crate::dedupe::processed::ProcessedSet;
use crate::domain::bookmark::WorkItem;

/// Everything a run touches, passed explicitly into the loop.
pub struct RunContext<T> {
    pub client: ServiceClient<T>,
    pub processed: ProcessedSet,
}

impl<T: HttpTransport> RunContext<T> {
    pub fn new(client: ServiceClient<T>) -> Self {
        Self {
            client,
            processed: ProcessedSet::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    Added,
    Duplicate,
    FetchFailed,
    SubmitFailed,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub added: usize,
    pub duplicates: usize,
    pub failed: usize,
}

pub async fn process_item<T: HttpTransport>(ctx: &mut RunContext<T>, item: &WorkItem) -> ItemOutcome {
    if ctx.processed.contains(item) {
        tracing::info!(%item, "duplicate, skipping");
        return ItemOutcome::Duplicate;
    }

    tracing::info!(%item, "processing");

    let metadata = match ctx.client.fetch_metadata(item).await {
        Ok(metadata) => metadata,
        Err(err) => {
            tracing::error!(%item, error = %err, "error fetching metadata");
            tracing::warn!(%item, "failed to process");
            return ItemOutcome::FetchFailed;
        }
    };

    match ctx.client.add_bookmark(&metadata).await {
        Ok(()) => {
            ctx.processed.record(item.clone());
            tracing::info!(%item, "successfully added");
            ItemOutcome::Added
        }
        Err(err) => {
            tracing::error!(%item, error = %err, "error adding bookmark");
            tracing::warn!(%item, "failed to process");
            ItemOutcome::SubmitFailed
        }
    }
}

/// Visits every item once, in order. Failures never stop the loop.
pub async fn process_items<T: HttpTransport>(
    ctx: &mut RunContext<T>,
    items: &[WorkItem],
) -> RunSummary {
    let mut summary = RunSummary::default();

    for item in items {
        match process_item(ctx, item).await {
            ItemOutcome::Added => summary.added += 1,
            ItemOutcome::Duplicate => summary.duplicates += 1,
            ItemOutcome::FetchFailed | ItemOutcome::SubmitFailed => summary.failed += 1,
        }
    }

    tracing::info!(
        added = summary.added,
        duplicates = summary.duplicates,
        failed = summary.failed,
        "run finished"
    );
    summary
}
