//! State actions and the reducer
//!
//! Every change to the application state is expressed as an [`Action`]
//! applied by [`reduce`]. The reducer is synchronous and pure with
//! respect to its inputs, which keeps the last-write-wins behavior of
//! the sync layer observable in unit tests: whatever action is applied
//! last determines the state, regardless of when its network
//! counterpart was issued.

use shared::models::{
    Apartment, Budget, Employee, ExtraWorker, InventoryItem, InventoryOperation, PropertyConfig,
    PropertyData, PropertyId, Sector, Supplier, apply_operation,
};
use shared::wire::MutationKind;

use crate::store::{AppState, CurrentUser, ViewType};

/// A single state transition.
#[derive(Debug, Clone)]
pub enum Action {
    /// Overwrite one property's whole dataset with a freshly
    /// normalized fetch result.
    ReplacePropertyData {
        property: PropertyId,
        data: Box<PropertyData>,
    },

    UpsertApartment {
        property: PropertyId,
        apartment: Apartment,
    },
    UpsertBudget {
        property: PropertyId,
        budget: Budget,
    },
    UpsertEmployee {
        property: PropertyId,
        employee: Employee,
    },
    UpsertExtra {
        property: PropertyId,
        extra: ExtraWorker,
    },
    UpsertSector {
        property: PropertyId,
        sector: Sector,
    },
    UpsertInventoryItem {
        property: PropertyId,
        item: InventoryItem,
    },
    UpsertSupplier {
        property: PropertyId,
        supplier: Supplier,
    },
    /// Adjust the referenced item and prepend to history.
    ApplyInventoryOperation {
        property: PropertyId,
        operation: InventoryOperation,
        now: i64,
    },
    MergeConfig {
        property: PropertyId,
        config: PropertyConfig,
    },
    /// Delete by id from the collection selected by `target`. No
    /// cascade: deleting a sector leaves its employees assigned to the
    /// now-dangling id.
    Delete {
        property: PropertyId,
        target: MutationKind,
        id: String,
    },

    /// Integration bookkeeping.
    MarkSyncSuccess { now: i64 },
    MarkSyncFailed,

    /// Navigation.
    SetActiveProperty(PropertyId),
    SetView(ViewType),
    SelectFloor(Option<u32>),
    SelectApartment(Option<String>),
    SelectSector(Option<String>),

    /// Session.
    Login(CurrentUser),
    Logout,
}

impl Action {
    /// The property whose remote copy this action presumes to change,
    /// when the change warrants a delayed re-fetch (see
    /// [`MutationKind::triggers_resync`]).
    pub fn resync_property(&self) -> Option<PropertyId> {
        let (property, kind) = match self {
            Action::UpsertApartment { property, .. } => (property, MutationKind::Apartment),
            Action::UpsertBudget { property, .. } => (property, MutationKind::Budget),
            Action::UpsertEmployee { property, .. } => (property, MutationKind::Employee),
            Action::UpsertExtra { property, .. } => (property, MutationKind::Extra),
            Action::UpsertSector { property, .. } => (property, MutationKind::Sector),
            Action::UpsertInventoryItem { property, .. } => (property, MutationKind::Inventory),
            Action::UpsertSupplier { property, .. } => (property, MutationKind::Supplier),
            Action::ApplyInventoryOperation { property, .. } => {
                (property, MutationKind::InventoryOp)
            }
            Action::MergeConfig { property, .. } => (property, MutationKind::Config),
            Action::Delete { property, .. } => (property, MutationKind::Delete),
            _ => return None,
        };
        kind.triggers_resync().then_some(*property)
    }
}

/// Replace the entity with a matching id in place, or append.
///
/// Replacement keeps the original position and never duplicates; no
/// referential integrity is checked.
fn upsert_by_id<T>(list: &mut Vec<T>, entity: T, id_of: impl Fn(&T) -> &str) {
    let id = id_of(&entity).to_string();
    match list.iter_mut().find(|e| id_of(e) == id) {
        Some(slot) => *slot = entity,
        None => list.push(entity),
    }
}

fn delete_by_id<T>(list: &mut Vec<T>, id: &str, id_of: impl Fn(&T) -> &str) {
    list.retain(|e| id_of(e) != id);
}

/// Apply one action to the state.
pub fn reduce(state: &mut AppState, action: Action) {
    match action {
        Action::ReplacePropertyData { property, data } => {
            state.properties.insert(property, *data);
        }

        Action::UpsertApartment {
            property,
            apartment,
        } => {
            let key = Apartment::key(apartment.floor, apartment.room_number);
            state.property_mut(property).apartments.insert(key, apartment);
        }
        Action::UpsertBudget { property, budget } => {
            upsert_by_id(&mut state.property_mut(property).budgets, budget, |b| &b.id);
        }
        Action::UpsertEmployee { property, employee } => {
            upsert_by_id(&mut state.property_mut(property).employees, employee, |e| {
                &e.id
            });
        }
        Action::UpsertExtra { property, extra } => {
            upsert_by_id(&mut state.property_mut(property).extras, extra, |e| &e.id);
        }
        Action::UpsertSector { property, sector } => {
            upsert_by_id(&mut state.property_mut(property).sectors, sector, |s| &s.id);
        }
        Action::UpsertInventoryItem { property, item } => {
            upsert_by_id(&mut state.property_mut(property).inventory, item, |i| &i.id);
        }
        Action::UpsertSupplier { property, supplier } => {
            upsert_by_id(&mut state.property_mut(property).suppliers, supplier, |s| {
                &s.id
            });
        }
        Action::ApplyInventoryOperation {
            property,
            operation,
            now,
        } => {
            let data = state.property_mut(property);
            apply_operation(
                &mut data.inventory,
                &mut data.inventory_history,
                operation,
                now,
            );
        }
        Action::MergeConfig { property, config } => {
            state.property_mut(property).config = config;
        }
        Action::Delete {
            property,
            target,
            id,
        } => {
            let data = state.property_mut(property);
            match target {
                MutationKind::Budget => delete_by_id(&mut data.budgets, &id, |b| &b.id),
                MutationKind::Employee => delete_by_id(&mut data.employees, &id, |e| &e.id),
                MutationKind::Extra => delete_by_id(&mut data.extras, &id, |e| &e.id),
                MutationKind::Sector => delete_by_id(&mut data.sectors, &id, |s| &s.id),
                MutationKind::Inventory => delete_by_id(&mut data.inventory, &id, |i| &i.id),
                MutationKind::Supplier => delete_by_id(&mut data.suppliers, &id, |s| &s.id),
                other => {
                    tracing::warn!(?other, id, "delete targeting unsupported collection ignored");
                }
            }
        }

        Action::MarkSyncSuccess { now } => state.integration.mark_connected(now),
        Action::MarkSyncFailed => state.integration.mark_sync_failed(),

        Action::SetActiveProperty(property) => {
            state.current_property = property;
            state.selected_floor = None;
            state.selected_apartment_id = None;
            state.selected_sector_id = None;
        }
        Action::SetView(view) => {
            state.current_view = view;
            state.selected_floor = None;
            state.selected_apartment_id = None;
        }
        Action::SelectFloor(floor) => state.selected_floor = floor,
        Action::SelectApartment(id) => state.selected_apartment_id = id,
        Action::SelectSector(id) => state.selected_sector_id = id,

        Action::Login(user) => state.current_user = Some(user),
        Action::Logout => state.current_user = None,
    }
}
