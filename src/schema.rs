//! Static per-entity import schemas: required/optional fields, semantic
//! types, select options and the synonym patterns auto-mapping relies on.
//! Field order is load-bearing: the mapper scans fields in declaration order
//! and the first synonym match wins.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Transactions,
    Invoices,
    Inventory,
}

impl EntityType {
    pub const ALL: [EntityType; 3] = [
        EntityType::Transactions,
        EntityType::Invoices,
        EntityType::Inventory,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Transactions => "transactions",
            Self::Invoices => "invoices",
            Self::Inventory => "inventory",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Transactions => "Transactions",
            Self::Invoices => "Factures",
            Self::Inventory => "Inventaire",
        }
    }

    pub fn from_key(key: &str) -> Option<EntityType> {
        Self::ALL.iter().find(|e| e.key() == key).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Number,
    Date,
    Email,
    Select,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Email => "email",
            Self::Select => "select",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub required: bool,
    pub field_type: FieldType,
    /// Valid values for `Select` fields; empty otherwise.
    pub options: &'static [&'static str],
    /// Substrings matched against normalized headers during auto-mapping.
    pub synonyms: &'static [&'static str],
    /// Representative value used in generated templates.
    pub example: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntitySchema {
    pub entity: EntityType,
    pub fields: &'static [FieldSpec],
}

impl EntitySchema {
    pub fn field(&self, key: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }
}

const CURRENCY_OPTIONS: &[&str] = &["MAD", "USD", "EUR", "GBP"];
const CURRENCY_SYNONYMS: &[&str] = &["currency", "devise", "monnaie", "curr"];
const DATE_SYNONYMS: &[&str] = &["date", "data", "fecha", "datum"];
const DESCRIPTION_SYNONYMS: &[&str] =
    &["desc", "description", "libelle", "libel", "detail", "motif", "raison"];
const CATEGORY_SYNONYMS: &[&str] = &["categor", "categ", "class", "groupe", "section"];

const TRANSACTION_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "date",
        label: "Date (YYYY-MM-DD)",
        required: true,
        field_type: FieldType::Date,
        options: &[],
        synonyms: DATE_SYNONYMS,
        example: "2024-01-15",
    },
    FieldSpec {
        key: "description",
        label: "Description",
        required: true,
        field_type: FieldType::Text,
        options: &[],
        synonyms: DESCRIPTION_SYNONYMS,
        example: "Transport vers client",
    },
    FieldSpec {
        key: "amount",
        label: "Montant",
        required: true,
        field_type: FieldType::Number,
        options: &[],
        synonyms: &["amount", "montant", "prix", "price", "total", "somme", "valeur"],
        example: "150.50",
    },
    FieldSpec {
        key: "type",
        label: "Type (income/expense)",
        required: true,
        field_type: FieldType::Select,
        options: &["income", "expense"],
        synonyms: &["type", "kind", "sort", "genre", "categorie"],
        example: "expense",
    },
    FieldSpec {
        key: "category",
        label: "Catégorie",
        required: false,
        field_type: FieldType::Text,
        options: &[],
        synonyms: CATEGORY_SYNONYMS,
        example: "Transport",
    },
    FieldSpec {
        key: "currency",
        label: "Devise",
        required: false,
        field_type: FieldType::Select,
        options: CURRENCY_OPTIONS,
        synonyms: CURRENCY_SYNONYMS,
        example: "MAD",
    },
    FieldSpec {
        key: "notes",
        label: "Notes",
        required: false,
        field_type: FieldType::Text,
        options: &[],
        synonyms: &["notes", "note", "comment", "remarque", "observation"],
        example: "Déplacement client A",
    },
];

const INVOICE_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "invoice_number",
        label: "Numéro Facture",
        required: false,
        field_type: FieldType::Text,
        options: &[],
        synonyms: &["invoice", "facture", "numero", "number", "ref"],
        example: "FAC-001",
    },
    FieldSpec {
        key: "client_name",
        label: "Nom Client",
        required: true,
        field_type: FieldType::Text,
        options: &[],
        synonyms: &["client", "customer", "nom", "name", "societe", "company"],
        example: "Société ABC",
    },
    FieldSpec {
        // No usable synonym pattern: email columns are mapped by hand.
        key: "client_email",
        label: "Email Client",
        required: false,
        field_type: FieldType::Email,
        options: &[],
        synonyms: &[],
        example: "contact@abc.com",
    },
    FieldSpec {
        key: "total_amount",
        label: "Montant Total",
        required: true,
        field_type: FieldType::Number,
        options: &[],
        synonyms: &["total", "amount", "montant"],
        example: "1500.00",
    },
    FieldSpec {
        key: "date_created",
        label: "Date Création (YYYY-MM-DD)",
        required: true,
        field_type: FieldType::Date,
        options: &[],
        synonyms: DATE_SYNONYMS,
        example: "2024-01-15",
    },
    FieldSpec {
        key: "status",
        label: "Statut",
        required: false,
        field_type: FieldType::Select,
        options: &["pending", "paid", "overdue"],
        synonyms: &["status", "statut", "etat", "state"],
        example: "pending",
    },
    FieldSpec {
        key: "currency",
        label: "Devise",
        required: false,
        field_type: FieldType::Select,
        options: CURRENCY_OPTIONS,
        synonyms: CURRENCY_SYNONYMS,
        example: "MAD",
    },
    FieldSpec {
        key: "description",
        label: "Description",
        required: false,
        field_type: FieldType::Text,
        options: &[],
        synonyms: DESCRIPTION_SYNONYMS,
        example: "Prestation janvier",
    },
];

const INVENTORY_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        key: "name",
        label: "Nom Article",
        required: true,
        field_type: FieldType::Text,
        options: &[],
        synonyms: &["name", "nom", "article", "produit", "item"],
        example: "Ordinateur portable",
    },
    FieldSpec {
        key: "category",
        label: "Catégorie",
        required: false,
        field_type: FieldType::Text,
        options: &[],
        synonyms: CATEGORY_SYNONYMS,
        example: "Informatique",
    },
    FieldSpec {
        key: "quantity",
        label: "Quantité",
        required: true,
        field_type: FieldType::Number,
        options: &[],
        synonyms: &["quantity", "quantite", "qty", "qte", "nombre"],
        example: "10",
    },
    FieldSpec {
        key: "unit_price",
        label: "Prix Unitaire",
        required: true,
        field_type: FieldType::Number,
        options: &[],
        synonyms: &["unit", "unitaire", "price", "prix"],
        example: "2500.00",
    },
    FieldSpec {
        key: "currency",
        label: "Devise",
        required: false,
        field_type: FieldType::Select,
        options: CURRENCY_OPTIONS,
        synonyms: CURRENCY_SYNONYMS,
        example: "MAD",
    },
    FieldSpec {
        key: "description",
        label: "Description",
        required: false,
        field_type: FieldType::Text,
        options: &[],
        synonyms: DESCRIPTION_SYNONYMS,
        example: "Dell Latitude 5520",
    },
];

const TRANSACTIONS_SCHEMA: EntitySchema = EntitySchema {
    entity: EntityType::Transactions,
    fields: TRANSACTION_FIELDS,
};

const INVOICES_SCHEMA: EntitySchema = EntitySchema {
    entity: EntityType::Invoices,
    fields: INVOICE_FIELDS,
};

const INVENTORY_SCHEMA: EntitySchema = EntitySchema {
    entity: EntityType::Inventory,
    fields: INVENTORY_FIELDS,
};

pub fn schema(entity: EntityType) -> &'static EntitySchema {
    match entity {
        EntityType::Transactions => &TRANSACTIONS_SCHEMA,
        EntityType::Invoices => &INVOICES_SCHEMA,
        EntityType::Inventory => &INVENTORY_SCHEMA,
    }
}
