//! core::catalog
//!
//! The type catalog: a description of every type fixtures can be built for.
//!
//! # Overview
//!
//! Rust has no runtime reflection, so the types, fields and accessor methods
//! that the selector model and the node builder need are described up front
//! in a [`TypeCatalog`]. Everything that queries type structure does so
//! through the [`Reflector`] trait, which keeps the resolution logic
//! independent of where the descriptions come from.
//!
//! # Kinds
//!
//! - **Scalar**: built-in leaf types (`bool`, `i32`, `string`, `uuid`, ...).
//!   Always present.
//! - **Record**: named fields, optional getter/setter methods.
//! - **List**: a homogeneous sequence of an element type.
//! - **Enum**: a closed set of variant names.
//! - **Interface**: an abstract type other types can declare as a supertype.
//!
//! Supertypes drive assignability and resolver fallback only; fields are not
//! inherited.
//!
//! # Example
//!
//! ```
//! use fixtura::core::catalog::{Reflector, TypeCatalog};
//! use fixtura::core::types::TypeKey;
//!
//! let catalog = TypeCatalog::builder()
//!     .record("Order", |r| r.field("id", "uuid").field("status", "Status").accessors())
//!     .enumeration("Status", ["New", "Paid"])
//!     .build()
//!     .unwrap();
//!
//! let order = TypeKey::new("Order").unwrap();
//! assert!(catalog.field(&order, "id").is_some());
//! assert!(catalog.method(&order, "get_id").is_some());
//! assert!(catalog.method(&order, "set_status").is_some());
//! ```

pub mod schema;

pub use schema::CatalogFile;

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::types::{TypeError, TypeKey};

/// Errors from building or loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error(transparent)]
    InvalidName(#[from] TypeError),

    #[error("type '{0}' is declared more than once")]
    Duplicate(TypeKey),

    #[error("type '{owner}' refers to unknown type '{missing}'")]
    UnknownType { owner: TypeKey, missing: TypeKey },

    #[error("method '{method}' of '{owner}' refers to unknown field '{field}'")]
    UnknownField {
        owner: TypeKey,
        method: String,
        field: String,
    },

    #[error("enum '{0}' must declare at least one variant")]
    EmptyEnum(TypeKey),

    #[error("type '{0}' has an empty field or method name")]
    EmptyName(TypeKey),

    #[error("failed to read catalog file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse catalog file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

/// The structural kind of a catalog type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Scalar,
    Record,
    List { element: TypeKey },
    Enum { variants: Vec<String> },
    Interface,
}

/// A field declared by a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: TypeKey,
}

/// Whether a method reads or writes a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodKind {
    Getter { field: String },
    Setter { field: String, param: TypeKey },
}

/// An accessor method declared by a record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    pub name: String,
    pub kind: MethodKind,
}

impl MethodDescriptor {
    /// Name of the field this method reads or writes.
    pub fn field(&self) -> &str {
        match &self.kind {
            MethodKind::Getter { field } | MethodKind::Setter { field, .. } => field,
        }
    }

    pub fn is_setter(&self) -> bool {
        matches!(self.kind, MethodKind::Setter { .. })
    }
}

/// Full description of one catalog type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    pub key: TypeKey,
    pub kind: TypeKind,
    pub fields: Vec<FieldDescriptor>,
    pub methods: Vec<MethodDescriptor>,
    pub supertypes: Vec<TypeKey>,
}

impl TypeDescriptor {
    fn scalar(key: TypeKey) -> Self {
        Self {
            key,
            kind: TypeKind::Scalar,
            fields: Vec::new(),
            methods: Vec::new(),
            supertypes: Vec::new(),
        }
    }
}

/// Read-only access to type structure.
///
/// This is the seam between selector/model resolution and the source of
/// type information. [`TypeCatalog`] is the provided implementation.
pub trait Reflector: Send + Sync {
    /// Look up a type description.
    fn describe(&self, ty: &TypeKey) -> Option<&TypeDescriptor>;

    /// Check whether a type is known.
    fn contains(&self, ty: &TypeKey) -> bool {
        self.describe(ty).is_some()
    }

    /// Look up a field declared directly by `ty`.
    fn field(&self, ty: &TypeKey, name: &str) -> Option<&FieldDescriptor> {
        self.describe(ty)?.fields.iter().find(|f| f.name == name)
    }

    /// Look up a method declared by `ty`.
    fn method(&self, ty: &TypeKey, name: &str) -> Option<&MethodDescriptor> {
        self.describe(ty)?.methods.iter().find(|m| m.name == name)
    }

    /// Find the setter that writes `field` on `ty`, if any.
    fn setter_for(&self, ty: &TypeKey, field: &str) -> Option<&MethodDescriptor> {
        self.describe(ty)?
            .methods
            .iter()
            .find(|m| m.is_setter() && m.field() == field)
    }

    /// Check whether a value of type `from` may be used where `to` is expected.
    ///
    /// True when the types are equal or `to` is a transitive supertype of `from`.
    fn is_assignable(&self, from: &TypeKey, to: &TypeKey) -> bool {
        if from == to {
            return true;
        }
        let mut seen = HashSet::new();
        let mut queue: VecDeque<&TypeKey> = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            let Some(desc) = self.describe(current) else {
                continue;
            };
            for sup in &desc.supertypes {
                if sup == to {
                    return true;
                }
                queue.push_back(sup);
            }
        }
        false
    }

    /// Supertypes of `ty` in breadth-first order, nearest first.
    fn ancestors_of(&self, ty: &TypeKey) -> Vec<TypeKey> {
        let mut out = Vec::new();
        let mut queue: VecDeque<TypeKey> = self
            .describe(ty)
            .map(|d| d.supertypes.iter().cloned().collect())
            .unwrap_or_default();
        while let Some(current) = queue.pop_front() {
            if out.contains(&current) || &current == ty {
                continue;
            }
            if let Some(desc) = self.describe(&current) {
                queue.extend(desc.supertypes.iter().cloned());
            }
            out.push(current);
        }
        out
    }

    /// Resolve a dotted field path (`address.city`) starting at `ty`.
    ///
    /// Returns every `(declaring type, field)` pair along the path, or the
    /// first segment that could not be resolved.
    fn field_path(
        &self,
        ty: &TypeKey,
        path: &str,
    ) -> Result<Vec<(TypeKey, FieldDescriptor)>, String> {
        let mut current = ty.clone();
        let mut out = Vec::new();
        for segment in path.split('.') {
            let field = self.field(&current, segment).ok_or_else(|| segment.to_string())?;
            out.push((current.clone(), field.clone()));
            current = field.ty.clone();
        }
        Ok(out)
    }
}

/// The standard [`Reflector`]: an immutable map of type descriptions.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    types: BTreeMap<TypeKey, TypeDescriptor>,
}

impl TypeCatalog {
    /// Start building a catalog. Scalars are always included.
    pub fn builder() -> TypeCatalogBuilder {
        TypeCatalogBuilder::default()
    }

    /// Load a catalog from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the file cannot be read, parsed, or
    /// describes an inconsistent catalog.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path).map_err(|e| CatalogError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file: CatalogFile = toml::from_str(&contents).map_err(|e| CatalogError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.into_builder().build()
    }

    /// Iterate all types in name order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.types.values()
    }

    /// All enum types with their variants.
    pub fn enums(&self) -> impl Iterator<Item = (&TypeKey, &[String])> {
        self.types.values().filter_map(|d| match &d.kind {
            TypeKind::Enum { variants } => Some((&d.key, variants.as_slice())),
            _ => None,
        })
    }
}

impl Reflector for TypeCatalog {
    fn describe(&self, ty: &TypeKey) -> Option<&TypeDescriptor> {
        self.types.get(ty)
    }
}

/// Unvalidated description of a record, filled in by [`TypeCatalogBuilder::record`].
#[derive(Debug, Default, Clone)]
pub struct RecordBuilder {
    fields: Vec<(String, String)>,
    getters: Vec<(String, String)>,
    setters: Vec<(String, String)>,
    supertypes: Vec<String>,
    accessors: bool,
}

impl RecordBuilder {
    /// Declare a field.
    pub fn field(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.fields.push((name.into(), ty.into()));
        self
    }

    /// Declare a getter method reading `field`.
    pub fn getter(mut self, method: impl Into<String>, field: impl Into<String>) -> Self {
        self.getters.push((method.into(), field.into()));
        self
    }

    /// Declare a setter method writing `field`.
    pub fn setter(mut self, method: impl Into<String>, field: impl Into<String>) -> Self {
        self.setters.push((method.into(), field.into()));
        self
    }

    /// Declare a supertype.
    pub fn implements(mut self, ty: impl Into<String>) -> Self {
        self.supertypes.push(ty.into());
        self
    }

    /// Add `get_<field>` and `set_<field>` for every field.
    pub fn accessors(mut self) -> Self {
        self.accessors = true;
        self
    }
}

#[derive(Debug, Clone)]
enum Pending {
    Record(RecordBuilder),
    List(String),
    Enum(Vec<String>),
    Interface(Vec<String>),
}

/// Builder for [`TypeCatalog`].
///
/// Names are validated and cross-references checked in [`build`](Self::build).
#[derive(Debug, Default, Clone)]
pub struct TypeCatalogBuilder {
    pending: Vec<(String, Pending)>,
}

impl TypeCatalogBuilder {
    pub fn record(
        mut self,
        name: impl Into<String>,
        describe: impl FnOnce(RecordBuilder) -> RecordBuilder,
    ) -> Self {
        let record = describe(RecordBuilder::default());
        self.pending.push((name.into(), Pending::Record(record)));
        self
    }

    pub fn list(mut self, name: impl Into<String>, element: impl Into<String>) -> Self {
        self.pending.push((name.into(), Pending::List(element.into())));
        self
    }

    pub fn enumeration<I, S>(mut self, name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let variants = variants.into_iter().map(Into::into).collect();
        self.pending.push((name.into(), Pending::Enum(variants)));
        self
    }

    pub fn interface<I, S>(mut self, name: impl Into<String>, supertypes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let supertypes = supertypes.into_iter().map(Into::into).collect();
        self.pending.push((name.into(), Pending::Interface(supertypes)));
        self
    }

    /// Validate and freeze the catalog.
    ///
    /// # Errors
    ///
    /// - `InvalidName` for malformed type names
    /// - `Duplicate` when a type is declared twice or shadows a scalar
    /// - `UnknownType` when a field, element or supertype names an undeclared type
    /// - `UnknownField` when an accessor names an undeclared field
    /// - `EmptyEnum` for enums without variants
    pub fn build(self) -> Result<TypeCatalog, CatalogError> {
        let mut types: BTreeMap<TypeKey, TypeDescriptor> = TypeKey::scalars()
            .map(|k| (k.clone(), TypeDescriptor::scalar(k)))
            .collect();

        for (name, pending) in self.pending {
            let key = TypeKey::new(name)?;
            if types.contains_key(&key) {
                return Err(CatalogError::Duplicate(key));
            }
            let desc = Self::describe(key.clone(), pending)?;
            types.insert(key, desc);
        }

        let catalog = TypeCatalog { types };
        Self::check_references(&catalog)?;
        Ok(catalog)
    }

    fn describe(key: TypeKey, pending: Pending) -> Result<TypeDescriptor, CatalogError> {
        let mut desc = TypeDescriptor::scalar(key.clone());
        match pending {
            Pending::List(element) => {
                desc.kind = TypeKind::List {
                    element: TypeKey::new(element)?,
                };
            }
            Pending::Enum(variants) => {
                if variants.is_empty() {
                    return Err(CatalogError::EmptyEnum(key));
                }
                desc.kind = TypeKind::Enum { variants };
            }
            Pending::Interface(supertypes) => {
                desc.kind = TypeKind::Interface;
                desc.supertypes = Self::keys(supertypes)?;
            }
            Pending::Record(record) => {
                desc.kind = TypeKind::Record;
                desc.supertypes = Self::keys(record.supertypes)?;
                for (name, ty) in record.fields {
                    if name.is_empty() {
                        return Err(CatalogError::EmptyName(key));
                    }
                    desc.fields.push(FieldDescriptor {
                        name,
                        ty: TypeKey::new(ty)?,
                    });
                }
                let mut getters = record.getters;
                let mut setters = record.setters;
                if record.accessors {
                    for f in &desc.fields {
                        getters.push((format!("get_{}", f.name), f.name.clone()));
                        setters.push((format!("set_{}", f.name), f.name.clone()));
                    }
                }
                for (method, field) in getters {
                    let kind = MethodKind::Getter {
                        field: field.clone(),
                    };
                    Self::push_method(&mut desc, method, &field, kind)?;
                }
                for (method, field) in setters {
                    let param = desc
                        .fields
                        .iter()
                        .find(|f| f.name == field)
                        .map(|f| f.ty.clone());
                    let Some(param) = param else {
                        return Err(CatalogError::UnknownField {
                            owner: key,
                            method,
                            field,
                        });
                    };
                    let kind = MethodKind::Setter {
                        field: field.clone(),
                        param,
                    };
                    Self::push_method(&mut desc, method, &field, kind)?;
                }
            }
        }
        Ok(desc)
    }

    fn push_method(
        desc: &mut TypeDescriptor,
        method: String,
        field: &str,
        kind: MethodKind,
    ) -> Result<(), CatalogError> {
        if method.is_empty() {
            return Err(CatalogError::EmptyName(desc.key.clone()));
        }
        if !desc.fields.iter().any(|f| f.name == field) {
            return Err(CatalogError::UnknownField {
                owner: desc.key.clone(),
                method,
                field: field.to_string(),
            });
        }
        // Explicit declarations win over generated accessors with the same name.
        if desc.methods.iter().any(|m| m.name == method) {
            return Ok(());
        }
        desc.methods.push(MethodDescriptor { name: method, kind });
        Ok(())
    }

    fn keys(names: Vec<String>) -> Result<Vec<TypeKey>, CatalogError> {
        names
            .into_iter()
            .map(|n| TypeKey::new(n).map_err(CatalogError::from))
            .collect()
    }

    fn check_references(catalog: &TypeCatalog) -> Result<(), CatalogError> {
        for desc in catalog.types() {
            let mut referenced: Vec<&TypeKey> = desc.fields.iter().map(|f| &f.ty).collect();
            referenced.extend(desc.supertypes.iter());
            if let TypeKind::List { element } = &desc.kind {
                referenced.push(element);
            }
            if let Some(missing) = referenced.into_iter().find(|t| !catalog.contains(t)) {
                return Err(CatalogError::UnknownType {
                    owner: desc.key.clone(),
                    missing: missing.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(s: &str) -> TypeKey {
        TypeKey::new(s).unwrap()
    }

    fn shop() -> TypeCatalog {
        TypeCatalog::builder()
            .interface("Entity", Vec::<String>::new())
            .interface("Auditable", ["Entity"])
            .record("Order", |r| {
                r.field("id", "uuid")
                    .field("lines", "Lines")
                    .field("status", "Status")
                    .implements("Auditable")
                    .accessors()
            })
            .record("OrderLine", |r| {
                r.field("sku", "string")
                    .field("qty", "i32")
                    .getter("quantity", "qty")
            })
            .list("Lines", "OrderLine")
            .enumeration("Status", ["New", "Paid"])
            .build()
            .unwrap()
    }

    mod build {
        use super::*;

        #[test]
        fn scalars_always_present() {
            let catalog = TypeCatalog::builder().build().unwrap();
            for scalar in TypeKey::scalars() {
                assert!(catalog.contains(&scalar));
            }
        }

        #[test]
        fn accessors_generated() {
            let catalog = shop();
            let order = key("Order");
            let getter = catalog.method(&order, "get_lines").unwrap();
            assert_eq!(getter.field(), "lines");
            let setter = catalog.method(&order, "set_id").unwrap();
            assert!(matches!(
                &setter.kind,
                MethodKind::Setter { param, .. } if *param == TypeKey::uuid()
            ));
        }

        #[test]
        fn explicit_getter() {
            let catalog = shop();
            let getter = catalog.method(&key("OrderLine"), "quantity").unwrap();
            assert_eq!(getter.field(), "qty");
            assert!(catalog.setter_for(&key("OrderLine"), "qty").is_none());
        }

        #[test]
        fn duplicate_rejected() {
            let result = TypeCatalog::builder()
                .record("A", |r| r)
                .record("A", |r| r)
                .build();
            assert!(matches!(result, Err(CatalogError::Duplicate(_))));
        }

        #[test]
        fn scalar_shadowing_rejected() {
            let result = TypeCatalog::builder().record("string", |r| r).build();
            assert!(matches!(result, Err(CatalogError::Duplicate(_))));
        }

        #[test]
        fn unknown_field_type_rejected() {
            let result = TypeCatalog::builder()
                .record("A", |r| r.field("b", "Missing"))
                .build();
            assert!(matches!(result, Err(CatalogError::UnknownType { .. })));
        }

        #[test]
        fn unknown_list_element_rejected() {
            let result = TypeCatalog::builder().list("Xs", "X").build();
            assert!(matches!(result, Err(CatalogError::UnknownType { .. })));
        }

        #[test]
        fn accessor_for_unknown_field_rejected() {
            let result = TypeCatalog::builder()
                .record("A", |r| r.setter("set_b", "b"))
                .build();
            assert!(matches!(result, Err(CatalogError::UnknownField { .. })));
        }

        #[test]
        fn empty_enum_rejected() {
            let result = TypeCatalog::builder()
                .enumeration("E", Vec::<String>::new())
                .build();
            assert!(matches!(result, Err(CatalogError::EmptyEnum(_))));
        }

        #[test]
        fn invalid_name_rejected() {
            let result = TypeCatalog::builder().record("bad name", |r| r).build();
            assert!(matches!(result, Err(CatalogError::InvalidName(_))));
        }
    }

    mod reflector {
        use super::*;

        #[test]
        fn assignable_through_supertypes() {
            let catalog = shop();
            assert!(catalog.is_assignable(&key("Order"), &key("Order")));
            assert!(catalog.is_assignable(&key("Order"), &key("Auditable")));
            assert!(catalog.is_assignable(&key("Order"), &key("Entity")));
            assert!(!catalog.is_assignable(&key("Entity"), &key("Order")));
            assert!(!catalog.is_assignable(&TypeKey::string(), &TypeKey::uuid()));
        }

        #[test]
        fn ancestors_nearest_first() {
            let catalog = shop();
            assert_eq!(
                catalog.ancestors_of(&key("Order")),
                vec![key("Auditable"), key("Entity")]
            );
        }

        #[test]
        fn field_path_resolves() {
            let catalog = TypeCatalog::builder()
                .record("Person", |r| r.field("address", "Address"))
                .record("Address", |r| r.field("city", "string"))
                .build()
                .unwrap();
            let path = catalog.field_path(&key("Person"), "address.city").unwrap();
            assert_eq!(path.len(), 2);
            assert_eq!(path[0].0, key("Person"));
            assert_eq!(path[1].0, key("Address"));
            assert_eq!(path[1].1.name, "city");
        }

        #[test]
        fn field_path_reports_bad_segment() {
            let catalog = shop();
            let err = catalog.field_path(&key("Order"), "lines.nope").unwrap_err();
            assert_eq!(err, "nope");
        }

        #[test]
        fn enums_listed() {
            let catalog = shop();
            let enums: Vec<_> = catalog.enums().collect();
            assert_eq!(enums.len(), 1);
            assert_eq!(enums[0].1, ["New".to_string(), "Paid".to_string()]);
        }
    }
}
