//! The trait every table implements, and the shared list loop

use super::context::QueryContext;
use super::sink::{RowSink, TableItem};
use super::types::TableDefinition;
use crate::api::VantaClient;
use crate::error::{Error, Result};
use crate::types::JsonObject;
use crate::pagination::{
    page_size_for, CursorPaginator, ListOutput, PageConsumer, PageRequest, PaginationState,
};
use async_trait::async_trait;
use serde::Serialize;
use std::future::Future;

/// A queryable table backed by the Vanta API
#[async_trait]
pub trait TableProvider: Send + Sync {
    /// Table name, columns and key columns
    fn definition(&self) -> &TableDefinition;

    /// Stream every matching item into the sink
    async fn list(
        &self,
        client: &VantaClient,
        ctx: &QueryContext,
        sink: &mut RowSink<'_>,
    ) -> Result<()>;

    /// Fetch one item by id. `Ok(None)` means there is no such item.
    async fn get(
        &self,
        _client: &VantaClient,
        _ctx: &QueryContext,
        _id: &str,
    ) -> Result<Option<TableItem>> {
        Err(Error::invalid_argument(format!(
            "table {} does not support lookup by id",
            self.definition().name
        )))
    }

    /// Attach separately fetched columns to an item
    async fn hydrate(
        &self,
        _client: &VantaClient,
        _ctx: &QueryContext,
        item: TableItem,
    ) -> Result<TableItem> {
        Ok(item)
    }
}

/// Page through a list endpoint, hydrating and pushing every item until the
/// last page or the row limit
pub async fn list_all<P, T, F, Fut>(
    provider: &P,
    client: &VantaClient,
    ctx: &QueryContext,
    sink: &mut RowSink<'_>,
    max_page_size: u32,
    fetch: F,
) -> Result<PaginationState>
where
    P: TableProvider + ?Sized,
    T: Serialize + Send + 'static,
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<ListOutput<T>>>,
{
    list_all_keyed(provider, client, ctx, sink, max_page_size, JsonObject::new(), fetch).await
}

/// Like [`list_all`], tagging every item with the key values (such as the
/// audit id) it was listed under
pub async fn list_all_keyed<P, T, F, Fut>(
    provider: &P,
    client: &VantaClient,
    ctx: &QueryContext,
    sink: &mut RowSink<'_>,
    max_page_size: u32,
    keys: JsonObject,
    fetch: F,
) -> Result<PaginationState>
where
    P: TableProvider + ?Sized,
    T: Serialize + Send + 'static,
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<ListOutput<T>>>,
{
    let page_size = page_size_for(sink.rows_remaining(), max_page_size);
    let paginator = CursorPaginator::new(provider.definition().name, page_size);
    let mut stream = ItemStream {
        provider,
        client,
        ctx,
        sink,
        keys,
    };
    paginator.run(fetch, &mut stream).await
}

/// Page consumer that feeds items into a [`RowSink`]
struct ItemStream<'s, 'a, P: ?Sized> {
    provider: &'s P,
    client: &'s VantaClient,
    ctx: &'s QueryContext,
    sink: &'s mut RowSink<'a>,
    keys: JsonObject,
}

#[async_trait]
impl<'s, 'a, T, P> PageConsumer<T> for ItemStream<'s, 'a, P>
where
    T: Serialize + Send + 'static,
    P: TableProvider + ?Sized,
{
    async fn consume(&mut self, page: Vec<T>) -> Result<bool> {
        for model in page {
            let mut item = TableItem::from_model(&model)?;
            item.extras.extend(self.keys.clone());
            let item = self.provider.hydrate(self.client, self.ctx, item).await?;
            self.sink.push(item)?;
            if self.sink.is_satisfied() {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
