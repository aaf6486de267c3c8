use super::types::{AssetPatch, CreateItem, UpdateItem, Uploads};
use super::{validate, ContentService};
use crate::assets::CleanupPlan;
use crate::config::CollectionSchema;
use crate::content::{ContentError, ContentItem};
use crate::metrics::{generate_request_id, OperationTimer};
use tracing::{info, instrument, warn};

impl ContentService {
    /// Create an item, bind its assets and relink the collection.
    ///
    /// # Errors
    ///
    /// - [`ContentError::UnknownCollection`], [`ContentError::Validation`] or
    ///   [`ContentError::AlreadyExists`] before anything is written
    /// - [`ContentError::AssetUpload`] if an upload fails; uploads already made
    ///   by this call are deleted and nothing is persisted
    /// - [`ContentError::Storage`] if the item cannot be saved
    #[instrument(skip_all, fields(collection = %collection, request_id = %generate_request_id()))]
    pub async fn create(
        &self,
        collection: &str,
        payload: CreateItem,
        uploads: Uploads,
    ) -> Result<ContentItem, ContentError> {
        let mut timer = OperationTimer::new("create", collection);
        let schema = self.schema(collection)?;
        validate::create(schema, &payload, &uploads)?;
        let key = validate::resolve_key(schema, &payload)?;
        timer.set_key(&key);
        if self.store.find_by_key(collection, &key).await?.is_some() {
            return Err(ContentError::AlreadyExists {
                collection: collection.to_string(),
                key,
            });
        }
        let order = match payload.order {
            Some(order) => order,
            None => self.next_order(collection).await?,
        };

        let mut item = ContentItem::new(key, order);
        item.is_active = payload.is_active.unwrap_or(true);
        item.fields = payload.fields;

        let mut plan = CleanupPlan::new();
        for (name, url) in &payload.external_assets {
            if let Some(field) = schema.asset_field(name) {
                self.binder.bind_external(&mut item, field, url, &mut plan);
            }
        }
        let plan = self.bind_uploads(&mut item, schema, &uploads, plan).await?;
        self.persist(collection, &item, plan).await?;
        info!(key = %item.key, order = item.order, active = item.is_active, "Created item");

        self.relink_after(collection, &mut item).await;
        Ok(item)
    }

    /// Apply a partial update.
    ///
    /// New uploads replace whatever their field held; the superseded managed
    /// assets are deleted in the background once the item is saved. The
    /// collection is relinked when the patch sets `order` or `isActive`.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`ContentService::create`], with
    /// [`ContentError::NotFound`] for a missing key.
    #[instrument(skip_all, fields(collection = %collection, key = %key, request_id = %generate_request_id()))]
    pub async fn update(
        &self,
        collection: &str,
        key: &str,
        patch: UpdateItem,
        uploads: Uploads,
    ) -> Result<ContentItem, ContentError> {
        let mut timer = OperationTimer::new("update", collection);
        timer.set_key(key);
        let schema = self.schema(collection)?;
        validate::update(schema, &patch, &uploads)?;
        let mut item = self.load(collection, key).await?;

        let mut plan = CleanupPlan::new();
        for (name, change) in &patch.assets {
            match change {
                AssetPatch::External(url) => {
                    if let Some(field) = schema.asset_field(name) {
                        self.binder.bind_external(&mut item, field, url, &mut plan);
                    }
                }
                AssetPatch::Clear => {
                    self.binder.unbind(&mut item, name, &mut plan);
                }
            }
        }
        let plan = self.bind_uploads(&mut item, schema, &uploads, plan).await?;

        for (name, value) in &patch.fields {
            if value.is_null() {
                item.fields.remove(name);
            } else {
                item.fields.insert(name.clone(), value.clone());
            }
        }
        if let Some(order) = patch.order {
            item.order = order;
        }
        if let Some(active) = patch.is_active {
            item.is_active = active;
        }
        item.touch();

        self.persist(collection, &item, plan).await?;
        info!(order = item.order, active = item.is_active, "Updated item");

        if patch.touches_ranking() {
            self.relink_after(collection, &mut item).await;
        }
        Ok(item)
    }

    /// Delete an item and every asset it holds, then relink the collection.
    ///
    /// Returns the item as it was before deletion.
    ///
    /// # Errors
    ///
    /// [`ContentError::NotFound`] if there is no such item,
    /// [`ContentError::Storage`] if it cannot be removed. Assets are only
    /// deleted once the item is gone.
    #[instrument(skip_all, fields(collection = %collection, key = %key, request_id = %generate_request_id()))]
    pub async fn delete(&self, collection: &str, key: &str) -> Result<ContentItem, ContentError> {
        let mut timer = OperationTimer::new("delete", collection);
        timer.set_key(key);
        let schema = self.schema(collection)?;
        let removed = self.load(collection, key).await?;

        let mut remaining = removed.clone();
        let mut plan = CleanupPlan::new();
        self.binder.cascade_delete(&mut remaining, schema, &mut plan);

        match self.store.delete_by_key(collection, key).await {
            Ok(true) => self.binder.commit(plan),
            Ok(false) => return Err(ContentError::not_found(collection, key)),
            Err(e) => {
                warn!(error = %e, "Failed to delete item; keeping its assets");
                return Err(e.into());
            }
        }
        info!(assets = removed.assets.len(), "Deleted item");

        self.relink_after(collection, &mut remaining).await;
        Ok(removed)
    }

    /// Upload every file in `uploads` into its field. On the first failure
    /// the uploads of this call are rolled back.
    async fn bind_uploads(
        &self,
        item: &mut ContentItem,
        schema: &CollectionSchema,
        uploads: &Uploads,
        mut plan: CleanupPlan,
    ) -> Result<CleanupPlan, ContentError> {
        for (name, upload) in uploads {
            let Some(field) = schema.asset_field(name) else {
                continue;
            };
            if let Err(source) = self.binder.bind(item, field, upload, &mut plan).await {
                warn!(field = %name, error = %source, "Asset upload failed; rolling back");
                self.binder.abort(plan);
                return Err(ContentError::AssetUpload {
                    field: name.clone(),
                    source,
                });
            }
        }
        Ok(plan)
    }

    async fn next_order(&self, collection: &str) -> Result<i64, ContentError> {
        let items = self.store.find_all_sorted_by_order(collection).await?;
        Ok(items
            .iter()
            .map(|item| item.order)
            .max()
            .map_or(0, |max| max.saturating_add(1)))
    }
}
