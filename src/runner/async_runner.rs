use csv_async::AsyncReaderBuilder;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio_stream::StreamExt;

use crate::{
    dto::{ProvisioningResult, RecordFormat},
    engine::{stage, ProvisioningService, StagedBatch},
    error::{Error, Result},
    normalizer::ColumnLayout,
    readers::{parse_first_sheet, QuoteTracker, RawRow, unterminated_quote},
};

const BUFFER_SIZE: usize = 1024;

/// Provisions accounts from an async byte stream, such as an upload body.
///
/// Delimited input is streamed: a reader future parses rows and sends them
/// through a channel to a processor future that normalizes them. Workbook
/// input is buffered and parsed on the blocking pool.
///
/// Accounts are only committed once the whole stream has been read successfully.
/// The commit runs on the blocking pool too, since namespace creation touches
/// the filesystem.
///
/// # Errors
/// Returns [`Error::MalformedInput`] if the stream cannot be read or parsed.
pub async fn provision_async<R>(
    service: &ProvisioningService,
    input: R,
    format: RecordFormat,
) -> Result<ProvisioningResult>
where
    R: AsyncRead + Unpin + Send,
{
    let batch = match format {
        RecordFormat::Delimited => stage_delimited(input).await?,
        RecordFormat::Workbook => stage_workbook(input).await?,
    };
    let service = service.clone();
    tokio::task::spawn_blocking(move || service.commit(batch))
        .await
        .map_err(|err| Error::MalformedInput(format!("account commit stopped: {err}")))
}

async fn stage_delimited<R>(input: R) -> Result<StagedBatch>
where
    R: AsyncRead + Unpin + Send,
{
    let (tx, rx) = mpsc::channel(BUFFER_SIZE);
    let (read, batch) = tokio::join!(
        read_rows(input, tx),
        stage_rows(rx, ColumnLayout::DELIMITED)
    );
    // Stream errors are critical - nothing staged is kept
    read?;
    Ok(batch)
}

/// Reads raw rows from a delimited stream and sends them through the provided channel.
async fn read_rows<R>(input: R, tx: mpsc::Sender<RawRow>) -> Result<()>
where
    R: AsyncRead + Unpin + Send,
{
    let mut csv_reader = AsyncReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .create_reader(QuoteTracker::new(input));

    {
        let mut records = csv_reader.records();
        while let Some(result) = records.next().await {
            let row: RawRow = result?.iter().map(String::from).collect();
            if tx.send(row).await.is_err() {
                // Receiver dropped, exit gracefully
                return Ok(());
            }
        }
    }

    if csv_reader.get_ref().is_inside_quotes() {
        return Err(unterminated_quote());
    }
    Ok(())
}

/// Normalizes rows received through the channel until the reader closes it.
async fn stage_rows(mut rx: mpsc::Receiver<RawRow>, layout: ColumnLayout) -> StagedBatch {
    let mut batch = StagedBatch::new(layout);
    while let Some(row) = rx.recv().await {
        batch.push_row(&row);
    }
    batch
}

async fn stage_workbook<R>(mut input: R) -> Result<StagedBatch>
where
    R: AsyncRead + Unpin + Send,
{
    let mut bytes = Vec::new();
    input.read_to_end(&mut bytes).await?;
    let rows = tokio::task::spawn_blocking(move || parse_first_sheet(bytes))
        .await
        .map_err(|err| Error::MalformedInput(format!("workbook parser stopped: {err}")))??;
    stage(rows.into_iter().map(Ok), ColumnLayout::WORKBOOK)
}
