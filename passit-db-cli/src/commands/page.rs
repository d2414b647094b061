use crate::error::{CliError, CliResult};
use passit_db_core::{Item, KeyCondition, KeyValueStore};
use passit_db_query::{Cursor, Page, PageRequest, Paginator};
use std::sync::Arc;

/// Arguments of `passit page`
#[derive(Debug, Default)]
pub struct PageArgs {
    pub table: String,
    pub index: Option<String>,
    pub partition: Option<(String, String)>,
    pub after: Option<String>,
    pub limit: Option<u32>,
    pub descending: bool,
}

impl PageArgs {
    fn request(&self) -> CliResult<PageRequest> {
        let mut request = match &self.partition {
            Some((attr, value)) => PageRequest::query(
                self.table.as_str(),
                KeyCondition::partition(attr.as_str(), value.as_str()),
            ),
            None if self.descending => {
                return Err(CliError::Usage(
                    "--descending needs --partition; scans have no order".to_string(),
                ))
            }
            None => PageRequest::scan(self.table.as_str()),
        };
        if let Some(index) = &self.index {
            request = request.with_index(index.as_str());
        }
        let after = self.after.as_deref().map(Cursor::parse).transpose()?;
        request = request.with_after(after).with_limit(self.limit);
        if self.descending {
            request = request.descending();
        }
        Ok(request)
    }
}

pub async fn run<S: KeyValueStore + ?Sized>(
    store: Arc<S>,
    args: &PageArgs,
) -> CliResult<Page<Item>> {
    let request = args.request()?;
    Ok(Paginator::new(store).fetch_items(&request).await?)
}
