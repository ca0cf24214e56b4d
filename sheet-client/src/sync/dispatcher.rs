//! Mutation dispatcher - optimistic local write plus best-effort POST
//!
//! Every save applies its action to the store first (the UI sees the
//! change immediately) and then posts to the sheet script from a
//! spawned task so nothing blocks. Transport failures and explicit
//! error envelopes mark the integration record `SyncFailed`; there is
//! no retry and the optimistic local update is never rolled back.

use std::sync::Arc;

use shared::models::{
    Apartment, Budget, Employee, ExtraWorker, InventoryItem, InventoryOperation, PropertyConfig,
    Sector, Supplier,
};
use shared::util::now_millis;
use shared::wire::{DeletePayload, FileAttachment, MutationKind, MutationRequest};

use crate::store::{Action, StateStore};
use crate::{ClientResult, SheetClient};

pub struct MutationDispatcher {
    store: Arc<StateStore>,
    client: SheetClient,
}

impl MutationDispatcher {
    pub fn new(store: Arc<StateStore>, client: SheetClient) -> Self {
        Self { store, client }
    }

    /// Post `request` without blocking the caller.
    fn send(&self, request: MutationRequest) {
        let client = self.client.clone();
        let store = self.store.clone();
        tokio::spawn(async move {
            match client.push_mutation(&request).await {
                Ok(()) => store.dispatch(Action::MarkSyncSuccess { now: now_millis() }),
                Err(e) => {
                    tracing::error!(data_type = ?request.data_type, "sheet sync failed: {e}");
                    store.dispatch(Action::MarkSyncFailed);
                }
            }
        });
    }

    /// Save an apartment inspection, optionally with inline photos.
    pub fn save_apartment(
        &self,
        apartment: Apartment,
        files: Vec<FileAttachment>,
    ) -> ClientResult<()> {
        let property = self.store.active_property();
        let request = MutationRequest::new(property, MutationKind::Apartment, &apartment)?
            .with_files(files);
        self.store.dispatch(Action::UpsertApartment {
            property,
            apartment,
        });
        self.send(request);
        Ok(())
    }

    pub fn save_budget(&self, budget: Budget, files: Vec<FileAttachment>) -> ClientResult<()> {
        let property = self.store.active_property();
        let request =
            MutationRequest::new(property, MutationKind::Budget, &budget)?.with_files(files);
        self.store.dispatch(Action::UpsertBudget { property, budget });
        self.send(request);
        Ok(())
    }

    pub fn save_employee(&self, employee: Employee) -> ClientResult<()> {
        let property = self.store.active_property();
        let request = MutationRequest::new(property, MutationKind::Employee, &employee)?;
        self.store
            .dispatch(Action::UpsertEmployee { property, employee });
        self.send(request);
        Ok(())
    }

    pub fn save_extra(&self, extra: ExtraWorker) -> ClientResult<()> {
        let property = self.store.active_property();
        let request = MutationRequest::new(property, MutationKind::Extra, &extra)?;
        self.store.dispatch(Action::UpsertExtra { property, extra });
        self.send(request);
        Ok(())
    }

    pub fn save_sector(&self, sector: Sector) -> ClientResult<()> {
        let property = self.store.active_property();
        let request = MutationRequest::new(property, MutationKind::Sector, &sector)?;
        self.store.dispatch(Action::UpsertSector { property, sector });
        self.send(request);
        Ok(())
    }

    pub fn save_inventory_item(&self, item: InventoryItem) -> ClientResult<()> {
        let property = self.store.active_property();
        let request = MutationRequest::new(property, MutationKind::Inventory, &item)?;
        self.store
            .dispatch(Action::UpsertInventoryItem { property, item });
        self.send(request);
        Ok(())
    }

    /// Record a stock movement; adjusts the referenced item locally
    /// and appends to the history.
    pub fn apply_inventory_operation(&self, operation: InventoryOperation) -> ClientResult<()> {
        let property = self.store.active_property();
        let request = MutationRequest::new(property, MutationKind::InventoryOp, &operation)?;
        self.store.dispatch(Action::ApplyInventoryOperation {
            property,
            operation,
            now: now_millis(),
        });
        self.send(request);
        Ok(())
    }

    pub fn save_supplier(&self, supplier: Supplier) -> ClientResult<()> {
        let property = self.store.active_property();
        let request = MutationRequest::new(property, MutationKind::Supplier, &supplier)?;
        self.store
            .dispatch(Action::UpsertSupplier { property, supplier });
        self.send(request);
        Ok(())
    }

    pub fn update_config(&self, config: PropertyConfig) -> ClientResult<()> {
        let property = self.store.active_property();
        let request = MutationRequest::new(property, MutationKind::Config, &config)?;
        self.store.dispatch(Action::MergeConfig { property, config });
        self.send(request);
        Ok(())
    }

    /// Delete an entity from the collection selected by `target`.
    pub fn delete(&self, target: MutationKind, id: impl Into<String>) -> ClientResult<()> {
        let property = self.store.active_property();
        let id = id.into();
        let request = MutationRequest::new(
            property,
            MutationKind::Delete,
            &DeletePayload {
                id: id.clone(),
                target_type: target,
            },
        )?;
        self.store.dispatch(Action::Delete {
            property,
            target,
            id,
        });
        self.send(request);
        Ok(())
    }
}
