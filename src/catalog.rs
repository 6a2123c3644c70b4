use std::{fmt, str::FromStr};

use heck::ToKebabCase;
use serde::{Deserialize, Serialize};

use crate::error::WorkbenchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordType {
    Customer,
    Vendor,
    InventoryItem,
    SalesOrder,
    PurchaseOrder,
    JournalEntry,
    Contact,
    Employee,
}

impl RecordType {
    pub const ALL: [RecordType; 8] = [
        RecordType::Customer,
        RecordType::Vendor,
        RecordType::InventoryItem,
        RecordType::SalesOrder,
        RecordType::PurchaseOrder,
        RecordType::JournalEntry,
        RecordType::Contact,
        RecordType::Employee,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Customer => "customer",
            RecordType::Vendor => "vendor",
            RecordType::InventoryItem => "inventoryItem",
            RecordType::SalesOrder => "salesOrder",
            RecordType::PurchaseOrder => "purchaseOrder",
            RecordType::JournalEntry => "journalEntry",
            RecordType::Contact => "contact",
            RecordType::Employee => "employee",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RecordType::Customer => "Customer",
            RecordType::Vendor => "Vendor",
            RecordType::InventoryItem => "Inventory Item",
            RecordType::SalesOrder => "Sales Order",
            RecordType::PurchaseOrder => "Purchase Order",
            RecordType::JournalEntry => "Journal Entry",
            RecordType::Contact => "Contact",
            RecordType::Employee => "Employee",
        }
    }

    pub fn kebab(&self) -> String {
        self.as_str().to_kebab_case()
    }

    pub fn fields(&self) -> &'static [FieldDef] {
        fields_for(*self)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = WorkbenchError;

    /// Accepts the identifier, its kebab form, or the label, ignoring case.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_kebab_case();
        RecordType::ALL
            .into_iter()
            .find(|candidate| {
                candidate.kebab() == wanted || candidate.label().to_kebab_case() == wanted
            })
            .ok_or_else(|| WorkbenchError::UnknownRecordType(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Phone,
    Date,
    Currency,
    Number,
    Checkbox,
    Select,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Phone => "phone",
            FieldType::Date => "date",
            FieldType::Currency => "currency",
            FieldType::Number => "number",
            FieldType::Checkbox => "checkbox",
            FieldType::Select => "select",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub field_id: &'static str,
    pub label: &'static str,
    pub required: bool,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

const fn required(field_id: &'static str, label: &'static str, field_type: FieldType) -> FieldDef {
    FieldDef {
        field_id,
        label,
        required: true,
        field_type,
    }
}

const fn optional(field_id: &'static str, label: &'static str, field_type: FieldType) -> FieldDef {
    FieldDef {
        field_id,
        label,
        required: false,
        field_type,
    }
}

use FieldType::{Checkbox, Currency, Date, Email, Number, Phone, Select, Text};

static CUSTOMER_FIELDS: &[FieldDef] = &[
    optional("entityid", "Customer ID", Text),
    optional("externalid", "External ID", Text),
    required("companyname", "Company Name", Text),
    required("email", "Email", Email),
    optional("phone", "Phone", Phone),
    optional("altphone", "Alt. Phone", Phone),
    optional("fax", "Fax", Phone),
    optional("url", "Web Address", Text),
    optional("isperson", "Individual", Checkbox),
    optional("firstname", "First Name", Text),
    optional("lastname", "Last Name", Text),
    optional("subsidiary", "Subsidiary", Select),
    optional("entitystatus", "Status", Select),
    optional("category", "Category", Select),
    optional("salesrep", "Sales Rep", Select),
    optional("terms", "Terms", Select),
    optional("currency", "Currency", Select),
    optional("creditlimit", "Credit Limit", Currency),
    optional("pricelevel", "Price Level", Select),
    optional("taxable", "Taxable", Checkbox),
    optional("billaddr1", "Billing Address 1", Text),
    optional("billaddr2", "Billing Address 2", Text),
    optional("billcity", "Billing City", Text),
    optional("billstate", "Billing State", Text),
    optional("billzip", "Billing Zip", Text),
    optional("billcountry", "Billing Country", Select),
    optional("comments", "Comments", Text),
];

static VENDOR_FIELDS: &[FieldDef] = &[
    optional("entityid", "Vendor ID", Text),
    optional("externalid", "External ID", Text),
    required("companyname", "Company Name", Text),
    required("subsidiary", "Subsidiary", Select),
    optional("email", "Email", Email),
    optional("phone", "Phone", Phone),
    optional("altphone", "Alt. Phone", Phone),
    optional("fax", "Fax", Phone),
    optional("url", "Web Address", Text),
    optional("isperson", "Individual", Checkbox),
    optional("category", "Category", Select),
    optional("terms", "Terms", Select),
    optional("currency", "Currency", Select),
    optional("creditlimit", "Credit Limit", Currency),
    optional("taxidnum", "Tax ID", Text),
    optional("is1099eligible", "1099 Eligible", Checkbox),
    optional("accountnumber", "Account Number", Text),
    optional("billaddr1", "Billing Address 1", Text),
    optional("billcity", "Billing City", Text),
    optional("billstate", "Billing State", Text),
    optional("billzip", "Billing Zip", Text),
    optional("billcountry", "Billing Country", Select),
    optional("comments", "Comments", Text),
];

static INVENTORY_ITEM_FIELDS: &[FieldDef] = &[
    required("itemid", "Item Name/Number", Text),
    optional("externalid", "External ID", Text),
    optional("displayname", "Display Name", Text),
    optional("upccode", "UPC Code", Text),
    optional("salesdescription", "Sales Description", Text),
    optional("purchasedescription", "Purchase Description", Text),
    required("subsidiary", "Subsidiary", Select),
    required("taxschedule", "Tax Schedule", Select),
    optional("cogsaccount", "COGS Account", Select),
    optional("assetaccount", "Asset Account", Select),
    optional("incomeaccount", "Income Account", Select),
    optional("costingmethod", "Costing Method", Select),
    optional("cost", "Purchase Price", Currency),
    optional("baseprice", "Base Price", Currency),
    optional("vendorname", "Vendor Name/Code", Text),
    optional("weight", "Weight", Number),
    optional("reorderpoint", "Reorder Point", Number),
    optional("preferredstocklevel", "Preferred Stock Level", Number),
    optional("location", "Location", Select),
    optional("isinactive", "Inactive", Checkbox),
];

static SALES_ORDER_FIELDS: &[FieldDef] = &[
    optional("externalid", "External ID", Text),
    required("entity", "Customer", Select),
    required("trandate", "Date", Date),
    optional("tranid", "Order #", Text),
    optional("otherrefnum", "PO #", Text),
    optional("orderstatus", "Status", Select),
    optional("memo", "Memo", Text),
    required("item", "Item", Select),
    required("quantity", "Quantity", Number),
    optional("rate", "Rate", Currency),
    optional("amount", "Amount", Currency),
    optional("taxcode", "Tax Code", Select),
    optional("location", "Location", Select),
    optional("department", "Department", Select),
    optional("class", "Class", Select),
    optional("salesrep", "Sales Rep", Select),
    optional("terms", "Terms", Select),
    optional("shipdate", "Ship Date", Date),
    optional("shipmethod", "Ship Via", Select),
    optional("currency", "Currency", Select),
];

static PURCHASE_ORDER_FIELDS: &[FieldDef] = &[
    optional("externalid", "External ID", Text),
    required("entity", "Vendor", Select),
    required("trandate", "Date", Date),
    required("subsidiary", "Subsidiary", Select),
    optional("tranid", "PO #", Text),
    optional("memo", "Memo", Text),
    required("item", "Item", Select),
    required("quantity", "Quantity", Number),
    optional("rate", "Rate", Currency),
    optional("amount", "Amount", Currency),
    optional("location", "Location", Select),
    optional("department", "Department", Select),
    optional("class", "Class", Select),
    optional("duedate", "Receive By", Date),
    optional("terms", "Terms", Select),
    optional("currency", "Currency", Select),
    optional("employee", "Employee", Select),
];

static JOURNAL_ENTRY_FIELDS: &[FieldDef] = &[
    optional("externalid", "External ID", Text),
    required("trandate", "Date", Date),
    required("subsidiary", "Subsidiary", Select),
    optional("tranid", "Entry No.", Text),
    optional("currency", "Currency", Select),
    optional("exchangerate", "Exchange Rate", Number),
    optional("memo", "Memo", Text),
    required("account", "Account", Select),
    optional("debit", "Debit", Currency),
    optional("credit", "Credit", Currency),
    optional("linememo", "Line Memo", Text),
    optional("entity", "Name", Select),
    optional("department", "Department", Select),
    optional("class", "Class", Select),
    optional("location", "Location", Select),
    optional("reversaldate", "Reversal Date", Date),
    optional("approved", "Approved", Checkbox),
];

static CONTACT_FIELDS: &[FieldDef] = &[
    optional("entityid", "Contact", Text),
    optional("externalid", "External ID", Text),
    required("firstname", "First Name", Text),
    required("lastname", "Last Name", Text),
    optional("email", "Email", Email),
    optional("phone", "Main Phone", Phone),
    optional("mobilephone", "Mobile Phone", Phone),
    optional("officephone", "Office Phone", Phone),
    optional("company", "Company", Select),
    optional("title", "Job Title", Text),
    optional("contactrole", "Role", Select),
    required("subsidiary", "Subsidiary", Select),
    optional("salutation", "Mr./Ms...", Text),
    optional("comments", "Comments", Text),
];

static EMPLOYEE_FIELDS: &[FieldDef] = &[
    optional("entityid", "Employee ID", Text),
    optional("externalid", "External ID", Text),
    required("firstname", "First Name", Text),
    required("lastname", "Last Name", Text),
    required("email", "Email", Email),
    required("subsidiary", "Subsidiary", Select),
    optional("title", "Job Title", Text),
    optional("phone", "Phone", Phone),
    optional("mobilephone", "Mobile Phone", Phone),
    optional("department", "Department", Select),
    optional("class", "Class", Select),
    optional("location", "Location", Select),
    optional("supervisor", "Supervisor", Select),
    optional("hiredate", "Hire Date", Date),
    optional("birthdate", "Birth Date", Date),
    optional("employeetype", "Type", Select),
    optional("employeestatus", "Status", Select),
    optional("issalesrep", "Sales Rep", Checkbox),
    optional("issupportrep", "Support Rep", Checkbox),
];

pub fn fields_for(record_type: RecordType) -> &'static [FieldDef] {
    match record_type {
        RecordType::Customer => CUSTOMER_FIELDS,
        RecordType::Vendor => VENDOR_FIELDS,
        RecordType::InventoryItem => INVENTORY_ITEM_FIELDS,
        RecordType::SalesOrder => SALES_ORDER_FIELDS,
        RecordType::PurchaseOrder => PURCHASE_ORDER_FIELDS,
        RecordType::JournalEntry => JOURNAL_ENTRY_FIELDS,
        RecordType::Contact => CONTACT_FIELDS,
        RecordType::Employee => EMPLOYEE_FIELDS,
    }
}

pub fn required_fields_for(record_type: RecordType) -> Vec<&'static FieldDef> {
    fields_for(record_type)
        .iter()
        .filter(|field| field.required)
        .collect()
}

pub fn find_field(record_type: RecordType, field_id: &str) -> Option<&'static FieldDef> {
    fields_for(record_type)
        .iter()
        .find(|field| field.field_id == field_id)
}

pub fn field_label(record_type: RecordType, field_id: &str) -> Option<&'static str> {
    find_field(record_type, field_id).map(|field| field.label)
}
