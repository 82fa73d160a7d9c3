//! Record table descriptors.

/// Suffix appended to a table name to form its partition key name.
pub const PARTITION_KEY_SUFFIX: &str = "Id";

/// A record table keyed by a single partition attribute.
///
/// The partition key name is always `name + "Id"`. It is derived when the
/// `TableSpec` is created and has no setter, so a table and its key cannot drift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    name: String,
    partition_key: KeyAttribute,
    billing_mode: BillingMode,
    removal_policy: RemovalPolicy,
}

/// A key attribute definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAttribute {
    pub name: String,
    pub attribute_type: AttributeType,
}

/// Scalar types a key attribute can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeType {
    #[default]
    String,
    Number,
    Binary,
}

impl AttributeType {
    /// The engine's short type code.
    pub fn code(&self) -> &'static str {
        match self {
            AttributeType::String => "S",
            AttributeType::Number => "N",
            AttributeType::Binary => "B",
        }
    }
}

/// Billing mode for the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BillingMode {
    #[default]
    PayPerRequest,
    Provisioned {
        read_capacity_units: u64,
        write_capacity_units: u64,
    },
}

impl BillingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingMode::PayPerRequest => "PAY_PER_REQUEST",
            BillingMode::Provisioned { .. } => "PROVISIONED",
        }
    }
}

/// What happens to the table when it leaves the stack or the stack is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemovalPolicy {
    Destroy,
    #[default]
    Retain,
}

impl TableSpec {
    /// Creates a pay-per-request table with a string partition key named `<name>Id`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let partition_key = KeyAttribute {
            name: format!("{name}{PARTITION_KEY_SUFFIX}"),
            attribute_type: AttributeType::String,
        };
        Self {
            name,
            partition_key,
            billing_mode: BillingMode::default(),
            removal_policy: RemovalPolicy::default(),
        }
    }

    /// Sets the partition key type. The key name stays derived from the table name.
    pub fn with_key_type(mut self, attribute_type: AttributeType) -> Self {
        self.partition_key.attribute_type = attribute_type;
        self
    }

    pub fn with_billing_mode(mut self, billing_mode: BillingMode) -> Self {
        self.billing_mode = billing_mode;
        self
    }

    pub fn with_removal_policy(mut self, removal_policy: RemovalPolicy) -> Self {
        self.removal_policy = removal_policy;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn partition_key(&self) -> &KeyAttribute {
        &self.partition_key
    }

    pub fn billing_mode(&self) -> BillingMode {
        self.billing_mode
    }

    pub fn removal_policy(&self) -> RemovalPolicy {
        self.removal_policy
    }
}

/// Returns true if `name` is accepted as a table name (3-255 chars of `[A-Za-z0-9_.-]`).
pub fn is_valid_table_name(name: &str) -> bool {
    (3..=255).contains(&name.len())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}
