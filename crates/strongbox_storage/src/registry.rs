//! Type registration.
//!
//! Each entity type registers a tag, the namespace it allocates from, a
//! shell factory used by the loader, an optional parameterless constructor
//! used by gameplay and duplication, a minimum privilege, and the list of
//! properties the generic copy pass may transfer. Registration happens once
//! at startup through a [`RegistryBuilder`]; the frozen [`TypeRegistry`] is
//! read-only for the rest of the process.

use std::any::{Any, type_name};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use strongbox_foundation::{
    EntityId, Error, ErrorKind, Namespace, Point3, Privilege, Result, Value,
};

use crate::entity::{Entity, EntityCore};

/// Builds an entity around a prepared core.
pub type Factory = fn(EntityCore) -> Box<dyn Entity>;

type Getter = Box<dyn Fn(&dyn Entity) -> Option<Value> + Send + Sync>;
type Setter = Box<dyn Fn(&mut dyn Entity, Value) -> Option<Result<()>> + Send + Sync>;

/// How the generic copy pass treats a property's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// Immutable scalar or shared text; copied as-is.
    Value,
    /// Entity reference; the copy points at the same entity.
    Reference,
    /// Owned composite; the getter produces a fresh snapshot, so the copy
    /// never shares state with the source.
    Composite,
}

/// A readable and writable attribute of an entity type.
pub struct Property {
    name: &'static str,
    kind: PropertyKind,
    owner: &'static str,
    get: Getter,
    set: Setter,
}

impl Property {
    /// Declares a property of the concrete type `T`.
    #[must_use]
    pub fn new<T: Entity + Any>(
        name: &'static str,
        kind: PropertyKind,
        get: fn(&T) -> Value,
        set: fn(&mut T, Value) -> Result<()>,
    ) -> Self {
        Self {
            name,
            kind,
            owner: type_name::<T>(),
            get: Box::new(move |entity: &dyn Entity| entity.downcast_ref::<T>().map(get)),
            set: Box::new(move |entity: &mut dyn Entity, value: Value| {
                entity.downcast_mut::<T>().map(|t| set(t, value))
            }),
        }
    }

    /// Returns the property name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the property kind.
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    fn mismatch(&self, entity: &dyn Entity) -> Error {
        Error::property_mismatch(self.name, self.owner, entity.tag())
    }

    /// Reads the property from an entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not of the declaring type.
    pub fn read(&self, entity: &dyn Entity) -> Result<Value> {
        (self.get)(entity).ok_or_else(|| self.mismatch(entity))
    }

    /// Writes the property on an entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not of the declaring type or the
    /// setter rejects the value.
    pub fn write(&self, entity: &mut dyn Entity, value: Value) -> Result<()> {
        match (self.set)(entity, value) {
            Some(result) => result,
            None => Err(self.mismatch(entity)),
        }
    }

    /// Copies the property's value from `src` to `dst`.
    ///
    /// # Errors
    ///
    /// Returns an error if either side rejects the value.
    pub fn copy(&self, src: &dyn Entity, dst: &mut dyn Entity) -> Result<()> {
        let value = self.read(src)?;
        self.write(dst, value)
    }
}

impl fmt::Debug for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Extracts an integer for property `name`.
///
/// # Errors
///
/// Returns a property mismatch if `value` is not an integer.
pub fn expect_int(name: &str, value: &Value) -> Result<i64> {
    value
        .as_int()
        .ok_or_else(|| Error::property_mismatch(name, "int", value.kind_name()))
}

/// Extracts an integer for property `name` and narrows it to `T`.
///
/// # Errors
///
/// Returns a property mismatch if `value` is not an integer or does not fit.
pub fn expect_narrow<T: TryFrom<i64>>(name: &str, value: &Value) -> Result<T> {
    let wide = expect_int(name, value)?;
    T::try_from(wide).map_err(|_| Error::property_mismatch(name, type_name::<T>(), "out-of-range int"))
}

/// Extracts a boolean for property `name`.
///
/// # Errors
///
/// Returns a property mismatch if `value` is not a boolean.
pub fn expect_bool(name: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| Error::property_mismatch(name, "bool", value.kind_name()))
}

/// Extracts shared text for property `name`.
///
/// # Errors
///
/// Returns a property mismatch if `value` is not text.
pub fn expect_text(name: &str, value: Value) -> Result<Arc<str>> {
    match value {
        Value::Text(s) => Ok(s),
        other => Err(Error::property_mismatch(name, "text", other.kind_name())),
    }
}

/// Extracts a point for property `name`.
///
/// # Errors
///
/// Returns a property mismatch if `value` is not a point.
pub fn expect_point(name: &str, value: &Value) -> Result<Point3> {
    value
        .as_point()
        .ok_or_else(|| Error::property_mismatch(name, "point", value.kind_name()))
}

/// Extracts an entity reference for property `name`. `Nil` is the empty reference.
///
/// # Errors
///
/// Returns a property mismatch if `value` is not a reference.
pub fn expect_entity(name: &str, value: &Value) -> Result<EntityId> {
    value
        .as_entity()
        .ok_or_else(|| Error::property_mismatch(name, "entity", value.kind_name()))
}

/// Registration of one entity type.
pub struct TypeInfo {
    tag: &'static str,
    namespace: Namespace,
    shell: Factory,
    constructor: Option<Factory>,
    min_privilege: Privilege,
    properties: Vec<Property>,
}

impl TypeInfo {
    /// Creates a registration with a shell factory only.
    ///
    /// Without [`constructable`](Self::constructable) the type can be loaded
    /// but not constructed by gameplay or duplicated.
    #[must_use]
    pub fn new(tag: &'static str, namespace: Namespace, shell: Factory) -> Self {
        Self {
            tag,
            namespace,
            shell,
            constructor: None,
            min_privilege: Privilege::Player,
            properties: Vec::new(),
        }
    }

    /// Adds a parameterless constructor gated by `min_privilege`.
    #[must_use]
    pub fn constructable(mut self, min_privilege: Privilege, constructor: Factory) -> Self {
        self.constructor = Some(constructor);
        self.min_privilege = min_privilege;
        self
    }

    /// Adds a copyable property.
    #[must_use]
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// Adds several copyable properties.
    #[must_use]
    pub fn with_properties(mut self, properties: impl IntoIterator<Item = Property>) -> Self {
        self.properties.extend(properties);
        self
    }

    /// Returns the type tag.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        self.tag
    }

    /// Returns the namespace identifiers are allocated from.
    #[must_use]
    pub fn namespace(&self) -> Namespace {
        self.namespace
    }

    /// Returns the minimum privilege required to construct this type.
    #[must_use]
    pub fn min_privilege(&self) -> Privilege {
        self.min_privilege
    }

    /// Returns true if the type has a parameterless constructor.
    #[must_use]
    pub fn has_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// Returns the copyable properties in declaration order.
    #[must_use]
    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// Looks up a property by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    fn check_namespace(&self, id: EntityId) -> Result<()> {
        if id.namespace() == Some(self.namespace) {
            Ok(())
        } else {
            Err(Error::new(ErrorKind::WrongNamespace {
                id,
                expected: self.namespace,
            }))
        }
    }

    /// Builds an uninitialized shell for the loader.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is outside this type's namespace.
    pub fn shell(&self, id: EntityId) -> Result<Box<dyn Entity>> {
        self.check_namespace(id)?;
        Ok((self.shell)(EntityCore::new(id, self.tag)))
    }

    /// Builds a fully initialized entity through the parameterless constructor.
    ///
    /// # Errors
    ///
    /// Returns an error if the type has no parameterless constructor or `id`
    /// is outside this type's namespace.
    pub fn construct(&self, id: EntityId) -> Result<Box<dyn Entity>> {
        let constructor = self
            .constructor
            .ok_or_else(|| Error::no_constructor(self.tag))?;
        self.check_namespace(id)?;
        Ok(constructor(EntityCore::new(id, self.tag)))
    }
}

impl fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeInfo")
            .field("tag", &self.tag)
            .field("namespace", &self.namespace)
            .field("constructable", &self.has_constructor())
            .field("min_privilege", &self.min_privilege)
            .field("properties", &self.properties)
            .finish()
    }
}

/// Collects registrations during startup.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    types: BTreeMap<&'static str, TypeInfo>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a type.
    ///
    /// # Errors
    ///
    /// Returns an error if the tag is already registered.
    pub fn register(&mut self, info: TypeInfo) -> Result<&mut Self> {
        if self.types.contains_key(info.tag) {
            return Err(Error::new(ErrorKind::DuplicateType(info.tag.to_string())));
        }
        self.types.insert(info.tag, info);
        Ok(self)
    }

    /// Completes registration. The returned registry is immutable.
    #[must_use]
    pub fn freeze(self) -> Arc<TypeRegistry> {
        Arc::new(TypeRegistry { types: self.types })
    }
}

/// Immutable mapping from type tag to registration.
#[derive(Debug)]
pub struct TypeRegistry {
    types: BTreeMap<&'static str, TypeInfo>,
}

impl TypeRegistry {
    /// Looks up a type by tag.
    #[must_use]
    pub fn get(&self, tag: &str) -> Option<&TypeInfo> {
        self.types.get(tag)
    }

    /// Looks up a type by tag, failing if unregistered.
    ///
    /// # Errors
    ///
    /// Returns an error if no type is registered under `tag`.
    pub fn require(&self, tag: &str) -> Result<&TypeInfo> {
        self.get(tag).ok_or_else(|| Error::unknown_type(tag))
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates registrations in tag order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeInfo> + '_ {
        self.types.values()
    }
}
