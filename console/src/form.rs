//! Product form controller
//!
//! Owns the create / edit dialog of the products page: field values,
//! validation, submission and pre-filling from the server when editing. When
//! a save succeeds the form resets itself and emits exactly one
//! [`FormDelegate::Completed`], which the products page turns into a slice
//! patch and a refetch. Navigation is never the form's business.

use crate::environment::ConsoleEnvironment;
use backoffice_client::{ApiError, Product, ProductDraft};
use backoffice_core::environment::Notification;
use backoffice_core::{Effect, Reducer, SmallVec, smallvec};
use std::sync::Arc;
use thiserror::Error;

/// Whether the form creates a product or edits an existing one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormMode {
    /// New product
    #[default]
    Create,
    /// Existing product
    Edit(i64),
}

/// Raw field values as typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    /// Name
    pub name: String,
    /// Price, unparsed
    pub price: String,
    /// Stock, unparsed
    pub stock: String,
    /// Category
    pub category: String,
    /// Listed in the shop
    pub is_active: bool,
}

impl Default for ProductFields {
    fn default() -> Self {
        Self {
            name: String::new(),
            price: String::new(),
            stock: String::new(),
            category: String::new(),
            is_active: true,
        }
    }
}

impl From<&Product> for ProductFields {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            price: product.price.to_string(),
            stock: product.stock.to_string(),
            category: product.category.clone(),
            is_active: product.is_active,
        }
    }
}

/// Form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFormState {
    /// The dialog is shown
    pub open: bool,
    /// Create or edit
    pub mode: FormMode,
    /// Field values
    pub fields: ProductFields,
    /// Inline error banner
    pub error: Option<String>,
    /// Loading the product to edit
    pub fetching: bool,
    /// A save is in flight
    pub submitting: bool,
}

/// One field edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductField {
    /// Name input
    Name(String),
    /// Price input
    Price(String),
    /// Stock input
    Stock(String),
    /// Category input
    Category(String),
    /// Active switch
    Active(bool),
}

/// Signal to the page hosting the form
#[derive(Debug, Clone, PartialEq)]
pub enum FormDelegate {
    /// A product was saved and the form closed
    Completed {
        /// The product as returned by the server
        product: Product,
        /// Created rather than updated
        created: bool,
    },
}

/// Actions of the form
#[derive(Debug, Clone, PartialEq)]
pub enum ProductFormAction {
    /// Open empty (`None`) or for editing the given product
    Open(Option<i64>),
    /// Close and reset
    Close,
    /// The product to edit arrived
    Prefilled(Result<Product, ApiError>),
    /// A field changed
    Edit(ProductField),
    /// Validate and save
    Submit,
    /// The save finished
    Saved(Result<Product, ApiError>),
    /// Hide the error banner
    DismissError,
    /// Outbound signal, handled by the host page
    Delegate(FormDelegate),
}

/// First rule a form violates
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationFailure {
    /// Blank name
    #[error("name is required")]
    NameRequired,
    /// Price missing, unparsable or not positive
    #[error("price must be greater than zero")]
    PriceInvalid,
    /// Stock missing, not an integer or negative
    #[error("stock must be zero or more")]
    StockInvalid,
    /// Blank category
    #[error("category is required")]
    CategoryRequired,
}

impl ValidationFailure {
    /// Catalog key of the message shown to the operator
    #[must_use]
    pub const fn message_key(self) -> &'static str {
        match self {
            Self::NameRequired => "products.nameRequired",
            Self::PriceInvalid => "products.priceInvalid",
            Self::StockInvalid => "products.stockInvalid",
            Self::CategoryRequired => "products.categoryRequired",
        }
    }
}

/// Check the fields in order and build the request body
///
/// # Errors
///
/// Returns the first rule violated.
pub fn validate(fields: &ProductFields) -> Result<ProductDraft, ValidationFailure> {
    let name = fields.name.trim();
    if name.is_empty() {
        return Err(ValidationFailure::NameRequired);
    }

    let price = fields
        .price
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|price| price.is_finite() && *price > 0.0)
        .ok_or(ValidationFailure::PriceInvalid)?;

    let stock = fields
        .stock
        .trim()
        .parse::<i64>()
        .ok()
        .filter(|stock| *stock >= 0)
        .ok_or(ValidationFailure::StockInvalid)?;

    let category = fields.category.trim();
    if category.is_empty() {
        return Err(ValidationFailure::CategoryRequired);
    }

    Ok(ProductDraft {
        name: name.to_string(),
        price,
        stock,
        category: category.to_string(),
        is_active: fields.is_active,
    })
}

/// Reducer for [`ProductFormState`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductFormReducer;

impl Reducer for ProductFormReducer {
    type State = ProductFormState;
    type Action = ProductFormAction;
    type Environment = ConsoleEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ProductFormAction::Open(None) => {
                *state = ProductFormState {
                    open: true,
                    ..ProductFormState::default()
                };
                SmallVec::new()
            },
            ProductFormAction::Open(Some(id)) => {
                *state = ProductFormState {
                    open: true,
                    mode: FormMode::Edit(id),
                    fetching: true,
                    ..ProductFormState::default()
                };
                let api = Arc::clone(&env.api);
                smallvec![Effect::future(async move {
                    Some(ProductFormAction::Prefilled(api.get_product(id).await))
                })]
            },
            ProductFormAction::Close => {
                *state = ProductFormState::default();
                SmallVec::new()
            },
            ProductFormAction::Prefilled(result) => {
                if !state.open || !state.fetching {
                    return SmallVec::new();
                }
                state.fetching = false;
                match result {
                    Ok(product) => {
                        state.fields = ProductFields::from(&product);
                        SmallVec::new()
                    },
                    Err(error) => {
                        state.error = Some(env.failure_message(&error));
                        smallvec![env.notify_failure(&error)]
                    },
                }
            },
            ProductFormAction::Edit(field) => {
                let fields = &mut state.fields;
                match field {
                    ProductField::Name(value) => fields.name = value,
                    ProductField::Price(value) => fields.price = value,
                    ProductField::Stock(value) => fields.stock = value,
                    ProductField::Category(value) => fields.category = value,
                    ProductField::Active(value) => fields.is_active = value,
                }
                SmallVec::new()
            },
            ProductFormAction::Submit => {
                if !state.open || state.submitting || state.fetching {
                    return SmallVec::new();
                }
                let draft = match validate(&state.fields) {
                    Ok(draft) => draft,
                    Err(failure) => {
                        tracing::debug!(%failure, "Product form rejected");
                        state.error = Some(env.t(failure.message_key()));
                        return SmallVec::new();
                    },
                };

                state.submitting = true;
                state.error = None;
                let api = Arc::clone(&env.api);
                let mode = state.mode;
                smallvec![Effect::future(async move {
                    let saved = match mode {
                        FormMode::Create => api.create_product(draft).await,
                        FormMode::Edit(id) => api.update_product(id, draft).await,
                    };
                    Some(ProductFormAction::Saved(saved))
                })]
            },
            ProductFormAction::Saved(Ok(product)) => {
                let created = state.mode == FormMode::Create;
                let key = if created {
                    "products.createSuccess"
                } else {
                    "products.updateSuccess"
                };
                tracing::info!(id = product.id, created, "Product saved");
                *state = ProductFormState::default();

                let delegate = FormDelegate::Completed { product, created };
                smallvec![
                    env.notify(Notification::success(env.t(key))),
                    Effect::future(async move { Some(ProductFormAction::Delegate(delegate)) }),
                ]
            },
            ProductFormAction::Saved(Err(error)) => {
                state.submitting = false;
                state.error = Some(env.failure_message(&error));
                smallvec![env.notify_failure(&error)]
            },
            ProductFormAction::DismissError => {
                state.error = None;
                SmallVec::new()
            },
            ProductFormAction::Delegate(_) => SmallVec::new(),
        }
    }
}
