//! Fetch/Normalize pipeline - raw sheet payload to canonical models
//!
//! The sheet script emits whatever the spreadsheet cells contain:
//! numeric IDs, JSON arrays flattened into strings, booleans spelled
//! out in text. Every coercion rule lives here, behind one boundary;
//! nothing downstream ever re-checks field types.
//!
//! Rules:
//! - IDs and foreign keys become strings (numbers are stringified).
//! - Array/object fields that arrive JSON-encoded are parsed; parse
//!   failure or absence yields empty, never the previous local value.
//! - Numeric fields become f64, defaulting to 0.
//! - Enum-ish text is matched case-insensitively against known tokens
//!   (including the legacy Portuguese spreadsheet tokens) with one
//!   fixed fallback per field.
//!
//! Normalizing already-normalized data is a no-op.

use std::collections::BTreeMap;

use serde_json::Value;
use shared::models::{
    Apartment, BedConfig, Budget, BudgetItem, BudgetStatus, Defect, Employee, ExtraWorker, Gender,
    InventoryItem, InventoryOperation, MaterialItem, MaterialQuote, OperationKind, PropertyConfig,
    PropertyData, ScheduleType, Sector, ShiftParity, Supplier, UniformItem, VacationStatus,
};
use shared::wire::RawPropertyData;

/// A material carries at most three supplier quotes.
const MAX_QUOTES: usize = 3;

/// Normalize one property's raw payload into the canonical dataset.
pub fn normalize_property(raw: RawPropertyData) -> PropertyData {
    PropertyData {
        apartments: normalize_apartments(raw.apartments.as_ref()),
        budgets: collection(raw.budgets.as_ref(), budget),
        employees: collection(raw.employees.as_ref(), employee),
        extras: collection(raw.extras.as_ref(), extra),
        sectors: collection(raw.sectors.as_ref(), sector),
        inventory: collection(raw.inventory.as_ref(), inventory_item),
        inventory_history: collection(raw.inventory_history.as_ref(), inventory_operation),
        suppliers: collection(raw.suppliers.as_ref(), supplier),
        config: normalize_config(raw.config.as_ref()),
    }
}

// =============================================================================
// Field coercion
// =============================================================================

/// Coerce a value to a string. Numbers are stringified; anything that
/// is neither a string nor a number becomes empty.
fn string(v: Option<&Value>) -> String {
    match v {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

/// Like [`string`], but empty results collapse to `None`.
fn opt_string(v: Option<&Value>) -> Option<String> {
    let s = string(v);
    (!s.is_empty()).then_some(s)
}

/// Coerce a value to f64. Numeric strings parse; everything else is 0.
fn number(v: Option<&Value>) -> f64 {
    match v {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Coerce a value to an integer timestamp/count.
fn integer(v: Option<&Value>) -> i64 {
    number(v) as i64
}

/// Coerce a value to bool. The sheet emits real booleans, "Sim"/"Não"
/// cells, or nothing at all.
fn boolean(v: Option<&Value>) -> bool {
    match v {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => {
            let s = s.trim();
            s.eq_ignore_ascii_case("true")
                || s.eq_ignore_ascii_case("yes")
                || s.eq_ignore_ascii_case("sim")
                || s == "1"
        }
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0) != 0.0,
        _ => false,
    }
}

/// Coerce a value to an array of values. A JSON-encoded string is
/// parsed; parse failure, wrong shape or absence all yield empty.
fn array(v: Option<&Value>) -> Vec<Value> {
    match v {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Coerce a value to a JSON object map, parsing JSON-encoded strings.
fn object(v: Option<&Value>) -> serde_json::Map<String, Value> {
    match v {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::String(s)) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        },
        _ => serde_json::Map::new(),
    }
}

/// Normalize a collection field: coerce to an array, then map each
/// object element through the entity normalizer.
fn collection<T>(v: Option<&Value>, f: fn(&serde_json::Map<String, Value>) -> T) -> Vec<T> {
    array(v)
        .iter()
        .filter_map(|item| item.as_object())
        .map(f)
        .collect()
}

fn field<'a>(map: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a Value> {
    map.get(key)
}

// =============================================================================
// Entity normalizers
// =============================================================================

fn normalize_apartments(v: Option<&Value>) -> BTreeMap<String, Apartment> {
    object(v)
        .iter()
        .filter_map(|(key, value)| {
            let map = value.as_object()?;
            Some((key.clone(), apartment(key, map)))
        })
        .collect()
}

fn apartment(key: &str, m: &serde_json::Map<String, Value>) -> Apartment {
    let floor = integer(field(m, "floor")).max(0) as u32;
    let room_number = integer(field(m, "roomNumber")).max(0) as u32;
    let id = {
        let raw = string(field(m, "id"));
        if raw.is_empty() { key.to_string() } else { raw }
    };
    Apartment {
        id,
        floor,
        room_number,
        defects: collection(field(m, "defects"), defect),
        floor_type: opt_string(field(m, "floorType")),
        floor_condition: opt_string(field(m, "floorCondition")),
        bathroom_type: opt_string(field(m, "bathroomType")),
        bathroom_condition: opt_string(field(m, "bathroomCondition")),
        has_safe: boolean(field(m, "hasSafe")),
        has_curtain: boolean(field(m, "hasCurtain")),
        curtain_condition: opt_string(field(m, "curtainCondition")),
        curtain_size: opt_string(field(m, "curtainSize")),
        curtain_coverage: opt_string(field(m, "curtainCoverage")),
        has_body_mirror: boolean(field(m, "hasBodyMirror")),
        body_mirror_condition: opt_string(field(m, "bodyMirrorCondition")),
        ac_brand: opt_string(field(m, "acBrand")),
        furniture_condition: opt_string(field(m, "furnitureCondition")),
        furniture_notes: array(field(m, "furnitureNotes"))
            .iter()
            .map(|v| string(Some(v)))
            .filter(|s| !s.is_empty())
            .collect(),
        beds: collection(field(m, "beds"), bed),
        has_door_control: boolean(field(m, "hasDoorControl")),
        has_hangers: boolean(field(m, "hasHangers")),
        hanger_quantity: number(field(m, "hangerQuantity")),
        has_paper_holder: boolean(field(m, "hasPaperHolder")),
        has_shampoo_holder: boolean(field(m, "hasShampooHolder")),
        shampoo_holder_condition: opt_string(field(m, "shampooHolderCondition")),
        lamp_type: opt_string(field(m, "lampType")),
        lamp_color: opt_string(field(m, "lampColor")),
        tv_brand: opt_string(field(m, "tvBrand")),
    }
}

fn defect(m: &serde_json::Map<String, Value>) -> Defect {
    Defect {
        id: string(field(m, "id")),
        description: string(field(m, "description")),
        timestamp: integer(field(m, "timestamp")),
        drive_link: string(field(m, "driveLink")),
        file_name: opt_string(field(m, "fileName")),
        file_type: opt_string(field(m, "fileType")),
        data: opt_string(field(m, "data")),
    }
}

fn bed(m: &serde_json::Map<String, Value>) -> BedConfig {
    BedConfig {
        bed_type: string(field(m, "bedType")),
        base_condition: opt_string(field(m, "baseCondition")),
        base_color: opt_string(field(m, "baseColor")),
        mattress_condition: opt_string(field(m, "mattressCondition")),
        mattress_color: opt_string(field(m, "mattressColor")),
        has_skirt: boolean(field(m, "hasSkirt")),
        skirt_color: opt_string(field(m, "skirtColor")),
    }
}

fn budget(m: &serde_json::Map<String, Value>) -> Budget {
    Budget {
        id: string(field(m, "id")),
        title: string(field(m, "title")),
        objective: string(field(m, "objective")),
        items: collection(field(m, "items"), budget_item),
        status: budget_status(&string(field(m, "status"))),
        created_at: integer(field(m, "createdAt")),
    }
}

fn budget_status(token: &str) -> BudgetStatus {
    match token.trim().to_uppercase().as_str() {
        "APPROVED" | "APROVADO" => BudgetStatus::Approved,
        "REJECTED" | "REJEITADO" => BudgetStatus::Rejected,
        _ => BudgetStatus::Pending,
    }
}

fn budget_item(m: &serde_json::Map<String, Value>) -> BudgetItem {
    BudgetItem {
        id: string(field(m, "id")),
        description: string(field(m, "description")),
        materials: collection(field(m, "materials"), material_item),
        labor_cost: number(field(m, "laborCost")),
        estimated_time: string(field(m, "estimatedTime")),
        service_provider: opt_string(field(m, "serviceProvider")),
    }
}

fn material_item(m: &serde_json::Map<String, Value>) -> MaterialItem {
    let mut quotes: Vec<MaterialQuote> = collection(field(m, "quotes"), material_quote);
    quotes.truncate(MAX_QUOTES);
    MaterialItem {
        id: string(field(m, "id")),
        name: string(field(m, "name")),
        quantity: number(field(m, "quantity")),
        unit: opt_string(field(m, "unit")),
        observation: opt_string(field(m, "observation")),
        quotes,
    }
}

fn material_quote(m: &serde_json::Map<String, Value>) -> MaterialQuote {
    MaterialQuote {
        supplier: string(field(m, "supplier")),
        value: number(field(m, "value")),
    }
}

fn employee(m: &serde_json::Map<String, Value>) -> Employee {
    let schedule_type = schedule_type(&string(field(m, "scheduleType")));
    Employee {
        id: string(field(m, "id")),
        name: string(field(m, "name")),
        role: string(field(m, "role")),
        gender: Gender::parse(&string(field(m, "gender"))),
        contact: string(field(m, "contact")),
        start_date: string(field(m, "startDate")),
        salary: number(field(m, "salary")),
        sector_id: string(field(m, "sectorId")),
        active: active_flag(field(m, "active")),
        schedule_type,
        shift_parity: (schedule_type == ScheduleType::TwelveHour)
            .then(|| shift_parity(&string(field(m, "shiftParity")))),
        working_hours: string(field(m, "workingHours")),
        weekly_day_off: string(field(m, "weeklyDayOff")),
        sunday_offs: array(field(m, "sundayOffs"))
            .iter()
            .map(|v| integer(Some(v)).max(0) as u32)
            .filter(|n| *n > 0)
            .collect(),
        vacation_status: vacation_status(&string(field(m, "vacationStatus"))),
        uniforms: collection(field(m, "uniforms"), uniform_item),
    }
}

/// Employees default to active when the sheet omits the column; an
/// explicit false (or the legacy "Inativo" text) deactivates.
fn active_flag(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("inativo") => false,
        Some(Value::String(s)) if s.trim().eq_ignore_ascii_case("ativo") => true,
        other => boolean(other),
    }
}

fn schedule_type(token: &str) -> ScheduleType {
    match token.trim().to_uppercase().as_str() {
        "12X36" => ScheduleType::TwelveHour,
        "ON_CALL" | "INTERMITENTE" => ScheduleType::OnCall,
        _ => ScheduleType::WeeklyRotation,
    }
}

fn shift_parity(token: &str) -> ShiftParity {
    match token.trim().to_uppercase().as_str() {
        "ODD" | "IMPAR" | "ÍMPAR" => ShiftParity::Odd,
        _ => ShiftParity::Even,
    }
}

fn vacation_status(token: &str) -> VacationStatus {
    match token.trim().to_uppercase().as_str() {
        "GRANTED" | "CONCEDIDA" => VacationStatus::Granted,
        _ => VacationStatus::Pending,
    }
}

fn uniform_item(m: &serde_json::Map<String, Value>) -> UniformItem {
    UniformItem {
        name: string(field(m, "name")),
        quantity: number(field(m, "quantity")),
    }
}

fn extra(m: &serde_json::Map<String, Value>) -> ExtraWorker {
    ExtraWorker {
        id: string(field(m, "id")),
        name: string(field(m, "name")),
        phone: string(field(m, "phone")),
        available_days: array(field(m, "availableDays"))
            .iter()
            .map(|v| string(Some(v)))
            .filter(|s| !s.is_empty())
            .collect(),
        rating: number(field(m, "rating")).clamp(0.0, 10.0),
        note: string(field(m, "note")),
        sector_id: string(field(m, "sectorId")),
    }
}

fn sector(m: &serde_json::Map<String, Value>) -> Sector {
    Sector {
        id: string(field(m, "id")),
        name: string(field(m, "name")),
        standard_uniform: collection(field(m, "standardUniform"), uniform_item),
    }
}

fn supplier(m: &serde_json::Map<String, Value>) -> Supplier {
    Supplier {
        id: string(field(m, "id")),
        name: string(field(m, "name")),
        contact: string(field(m, "contact")),
        category: string(field(m, "category")),
    }
}

fn inventory_item(m: &serde_json::Map<String, Value>) -> InventoryItem {
    InventoryItem {
        id: string(field(m, "id")),
        ean: opt_string(field(m, "ean")),
        name: string(field(m, "name")),
        category: string(field(m, "category")),
        quantity: number(field(m, "quantity")),
        min_quantity: number(field(m, "minQuantity")),
        unit: string(field(m, "unit")),
        price: number(field(m, "price")),
        supplier_id: opt_string(field(m, "supplierId")),
        last_update: integer(field(m, "lastUpdate")),
    }
}

fn inventory_operation(m: &serde_json::Map<String, Value>) -> InventoryOperation {
    InventoryOperation {
        id: string(field(m, "id")),
        item_id: string(field(m, "itemId")),
        item_name: string(field(m, "itemName")),
        kind: operation_kind(&string(field(m, "type"))),
        quantity: number(field(m, "quantity")),
        timestamp: integer(field(m, "timestamp")),
        user: string(field(m, "user")),
        reason: opt_string(field(m, "reason")),
    }
}

fn operation_kind(token: &str) -> OperationKind {
    match token.trim().to_uppercase().as_str() {
        "OUTBOUND" | "SAÍDA" | "SAIDA" | "OUT" => OperationKind::Outbound,
        _ => OperationKind::Inbound,
    }
}

fn normalize_config(v: Option<&Value>) -> PropertyConfig {
    let m = object(v);
    PropertyConfig {
        show_suppliers_tab: match field(&m, "showSuppliersTab") {
            None => true,
            some => boolean(some),
        },
    }
}
