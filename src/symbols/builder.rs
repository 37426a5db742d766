//! Builders the binder collaborator uses to assemble a symbol graph.
//!
//! Symbols are immutable once they escape their builder, so everything that
//! needs to be known up front (ids, parameter keys, accessor wiring) is
//! settled here. Base-type and interface-list edges can be supplied eagerly or
//! as thunks; thunks go through [`LazyCell`](crate::symbols::LazyCell) so
//! cyclic declarations resolve to the graph's sentinel instead of recursing.
//!
//! Type and method builders allocate their symbol's id at creation time, not
//! at `build()`: the id is the `declaration` component of the [`ParamKey`] of
//! every type parameter the builder mints, and parameters must be usable in
//! signatures before the owning symbol exists.

use std::sync::{Arc, OnceLock};

use crate::symbols::{
    Accessibility, LazyCell, MemberRc, MemberRef, MemberSymbol, MethodKind, MethodSymbol,
    ModifiedType, NamedInit, NamedType, ParamConstraints, ParamKey, ParamOwnerKind,
    ParameterSymbol, PropertySymbol, EventSymbol, SpecialKind, SymbolId, TypeKind, TypeParameter,
    TypeRc, TypeSymbol,
};
use crate::symbols::IdAllocator;
use crate::SymbolGraph;

enum BaseEdge {
    Ready(Option<TypeRc>),
    Lazy(Box<dyn FnOnce() -> Option<TypeRc> + Send>),
}

enum InterfaceEdges {
    Ready(Vec<TypeRc>),
    Lazy(Box<dyn FnOnce() -> Vec<TypeRc> + Send>),
}

/// Builder for a named type definition.
///
/// ```
/// use dotsym::{SymbolGraph, TypeBuilder, TypeKind};
///
/// let graph = SymbolGraph::new();
/// let list = TypeBuilder::new(&graph, "Collections", "List`1")
///     .kind(TypeKind::Class)
///     .type_param("T")
///     .build();
/// assert!(list.as_named().unwrap().is_generic());
/// ```
pub struct TypeBuilder {
    ids: IdAllocator,
    error: TypeRc,
    id: SymbolId,
    namespace: String,
    name: String,
    kind: TypeKind,
    is_abstract: bool,
    type_parameters: Vec<TypeRc>,
    base: BaseEdge,
    interfaces: InterfaceEdges,
}

impl TypeBuilder {
    /// Starts a new type definition in `graph`. The symbol's id is allocated
    /// immediately.
    #[must_use]
    pub fn new(graph: &SymbolGraph, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ids: graph.ids.clone(),
            error: graph.error_type(),
            id: graph.ids.next(),
            namespace: namespace.into(),
            name: name.into(),
            kind: TypeKind::Class,
            is_abstract: false,
            type_parameters: Vec::new(),
            base: BaseEdge::Ready(None),
            interfaces: InterfaceEdges::Ready(Vec::new()),
        }
    }

    /// Sets the declaration kind (default: class).
    #[must_use]
    pub fn kind(mut self, kind: TypeKind) -> Self {
        self.kind = kind;
        self
    }

    /// Marks the type abstract.
    #[must_use]
    pub fn abstract_type(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Appends an unconstrained type parameter.
    #[must_use]
    pub fn type_param(self, name: impl Into<String>) -> Self {
        self.constrained_type_param(name, ParamConstraints::empty())
    }

    /// Appends a type parameter with the given constraint set.
    #[must_use]
    pub fn constrained_type_param(
        mut self,
        name: impl Into<String>,
        constraints: ParamConstraints,
    ) -> Self {
        let index = self.type_parameters.len() as u32;
        self.type_parameters
            .push(Arc::new(TypeSymbol::Parameter(TypeParameter {
                id: self.ids.next(),
                name: name.into(),
                key: ParamKey {
                    owner_kind: ParamOwnerKind::Type,
                    declaration: self.id,
                    index,
                },
                constraints,
            })));
        self
    }

    /// Sets the base type eagerly.
    #[must_use]
    pub fn base(mut self, base: TypeRc) -> Self {
        self.base = BaseEdge::Ready(Some(base));
        self
    }

    /// Defers base-type resolution to `thunk`, run on first access. A cyclic
    /// lookup observes the graph's error placeholder instead of recursing.
    #[must_use]
    pub fn base_lazy(mut self, thunk: impl FnOnce() -> Option<TypeRc> + Send + 'static) -> Self {
        self.base = BaseEdge::Lazy(Box::new(thunk));
        self
    }

    /// Appends a directly-implemented (or, for interfaces, base) interface.
    #[must_use]
    pub fn implements(mut self, interface: TypeRc) -> Self {
        match &mut self.interfaces {
            InterfaceEdges::Ready(list) => list.push(interface),
            InterfaceEdges::Lazy(_) => {
                self.interfaces = InterfaceEdges::Ready(vec![interface]);
            }
        }
        self
    }

    /// Defers interface-list resolution to `thunk`, run on first access. A
    /// cyclic lookup observes an empty list. Replaces any interfaces added
    /// eagerly.
    #[must_use]
    pub fn implements_lazy(mut self, thunk: impl FnOnce() -> Vec<TypeRc> + Send + 'static) -> Self {
        self.interfaces = InterfaceEdges::Lazy(Box::new(thunk));
        self
    }

    /// Creates the type symbol. Members are appended afterwards through the
    /// member builders.
    #[must_use]
    pub fn build(self) -> TypeRc {
        let type_arguments = self
            .type_parameters
            .iter()
            .map(|parameter| ModifiedType::bare(parameter.clone()))
            .collect();

        let base = match self.base {
            BaseEdge::Ready(value) => LazyCell::ready(value),
            BaseEdge::Lazy(thunk) => LazyCell::suspended(Some(self.error.clone()), thunk),
        };
        let interfaces = match self.interfaces {
            InterfaceEdges::Ready(value) => LazyCell::ready(value),
            InterfaceEdges::Lazy(thunk) => LazyCell::suspended(Vec::new(), thunk),
        };

        NamedType::create(NamedInit {
            id: self.id,
            namespace: self.namespace,
            name: self.name,
            kind: self.kind,
            is_abstract: self.is_abstract,
            special: None,
            tuple_element_names: None,
            type_parameters: self.type_parameters,
            original: None,
            type_arguments,
            substitution: None,
            base,
            interfaces,
        })
    }
}

/// Builder for a method member of a named type definition.
pub struct MethodBuilder {
    ids: IdAllocator,
    ty: TypeRc,
    id: SymbolId,
    name: String,
    kind: MethodKind,
    type_parameters: Vec<TypeRc>,
    parameters: Vec<ParameterSymbol>,
    return_type: ModifiedType,
    is_static: bool,
    is_virtual: bool,
    is_override: bool,
    accessibility: Accessibility,
    override_target: Option<MemberRc>,
    explicit_implementations: Vec<MemberRc>,
}

impl MethodBuilder {
    /// Starts a new method on `ty`, returning `void` by default. The method's
    /// id is allocated immediately so its type parameters can carry it.
    #[must_use]
    pub fn new(graph: &SymbolGraph, ty: &TypeRc, name: impl Into<String>) -> Self {
        Self {
            ids: graph.ids.clone(),
            ty: ty.clone(),
            id: graph.ids.next(),
            name: name.into(),
            kind: MethodKind::Ordinary,
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            return_type: ModifiedType::bare(graph.primitive(SpecialKind::Void)),
            is_static: false,
            is_virtual: false,
            is_override: false,
            accessibility: Accessibility::Public,
            override_target: None,
            explicit_implementations: Vec::new(),
        }
    }

    /// Sets the semantic kind (default: ordinary).
    #[must_use]
    pub fn kind(mut self, kind: MethodKind) -> Self {
        self.kind = kind;
        self
    }

    /// Appends a generic type parameter and returns its symbol for use in the
    /// signature under construction.
    pub fn add_type_param(&mut self, name: impl Into<String>) -> TypeRc {
        let index = self.type_parameters.len() as u32;
        let parameter: TypeRc = Arc::new(TypeSymbol::Parameter(TypeParameter {
            id: self.ids.next(),
            name: name.into(),
            key: ParamKey {
                owner_kind: ParamOwnerKind::Method,
                declaration: self.id,
                index,
            },
            constraints: ParamConstraints::empty(),
        }));
        self.type_parameters.push(parameter.clone());
        parameter
    }

    /// Appends a formal parameter.
    #[must_use]
    pub fn param(mut self, parameter: ParameterSymbol) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the return type occurrence.
    #[must_use]
    pub fn returns(mut self, return_type: ModifiedType) -> Self {
        self.return_type = return_type;
        self
    }

    /// Marks the method static.
    #[must_use]
    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Marks the method virtual.
    #[must_use]
    pub fn virtual_method(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    /// Sets the declared accessibility (default: public).
    #[must_use]
    pub fn accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Marks the method as an override of `target`. Overrides are virtual.
    #[must_use]
    pub fn override_of(mut self, target: &MemberRc) -> Self {
        self.is_virtual = true;
        self.is_override = true;
        self.override_target = Some(target.clone());
        self
    }

    /// Records an interface member this method explicitly implements.
    ///
    /// An ordinary-kind method gains the explicit-implementation kind; other
    /// kinds (accessors) keep theirs.
    #[must_use]
    pub fn explicit_impl(mut self, target: &MemberRc) -> Self {
        if self.kind == MethodKind::Ordinary {
            self.kind = MethodKind::ExplicitInterfaceImplementation;
        }
        self.explicit_implementations.push(target.clone());
        self
    }

    /// Creates the method symbol and appends it to the containing type's
    /// member list.
    ///
    /// # Panics
    /// Panics if the containing type is not a named type definition.
    #[must_use]
    pub fn build(self) -> MemberRc {
        let named = self
            .ty
            .as_named()
            .expect("methods can only be declared on named types");

        let overridden = OnceLock::new();
        if let Some(target) = &self.override_target {
            let _ = overridden.set(MemberRef::new(target));
        }

        let explicit_implementations = Arc::new(boxcar::Vec::new());
        for target in &self.explicit_implementations {
            explicit_implementations.push(MemberRef::new(target));
        }

        let member: MemberRc = Arc::new(MemberSymbol::Method(MethodSymbol {
            id: self.id,
            name: self.name,
            kind: self.kind,
            type_parameters: self.type_parameters,
            parameters: self.parameters,
            return_type: self.return_type,
            is_static: self.is_static,
            is_virtual: self.is_virtual,
            is_override: self.is_override,
            accessibility: self.accessibility,
            containing_type: named.self_ref(),
            overridden,
            explicit_implementations,
            forwards_to: None,
        }));
        named.declared_members.push(member.clone());
        member
    }
}

/// Builder for a property (or indexer) member.
///
/// Accessors are either synthesized here (`getter()`/`setter()`) or supplied
/// prebuilt through `with_get_method`/`with_set_method` when the caller needs
/// full control over accessor flags, overrides or explicit implementations.
pub struct PropertyBuilder {
    ids: IdAllocator,
    void: TypeRc,
    ty: TypeRc,
    name: String,
    property_type: ModifiedType,
    parameters: Vec<ParameterSymbol>,
    wants_getter: bool,
    wants_setter: bool,
    get_method: Option<MemberRc>,
    set_method: Option<MemberRc>,
    is_static: bool,
    is_virtual: bool,
    accessibility: Accessibility,
}

impl PropertyBuilder {
    /// Starts a new property of type `property_type` on `ty`.
    #[must_use]
    pub fn new(
        graph: &SymbolGraph,
        ty: &TypeRc,
        name: impl Into<String>,
        property_type: ModifiedType,
    ) -> Self {
        Self {
            ids: graph.ids.clone(),
            void: graph.primitive(SpecialKind::Void),
            ty: ty.clone(),
            name: name.into(),
            property_type,
            parameters: Vec::new(),
            wants_getter: false,
            wants_setter: false,
            get_method: None,
            set_method: None,
            is_static: false,
            is_virtual: false,
            accessibility: Accessibility::Public,
        }
    }

    /// Synthesizes a `get_Name` accessor at build time.
    #[must_use]
    pub fn getter(mut self) -> Self {
        self.wants_getter = true;
        self
    }

    /// Synthesizes a `set_Name` accessor at build time.
    #[must_use]
    pub fn setter(mut self) -> Self {
        self.wants_setter = true;
        self
    }

    /// Uses a prebuilt getter accessor instead of synthesizing one.
    #[must_use]
    pub fn with_get_method(mut self, accessor: MemberRc) -> Self {
        self.get_method = Some(accessor);
        self
    }

    /// Uses a prebuilt setter accessor instead of synthesizing one.
    #[must_use]
    pub fn with_set_method(mut self, accessor: MemberRc) -> Self {
        self.set_method = Some(accessor);
        self
    }

    /// Appends an indexer parameter.
    #[must_use]
    pub fn param(mut self, parameter: ParameterSymbol) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Marks the property and its synthesized accessors static.
    #[must_use]
    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Marks synthesized accessors virtual.
    #[must_use]
    pub fn virtual_accessors(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    /// Sets the declared accessibility (default: public).
    #[must_use]
    pub fn accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Creates the property symbol and appends it, together with any
    /// synthesized accessor methods, to the containing type's member list.
    ///
    /// # Panics
    /// Panics if the containing type is not a named type definition.
    #[must_use]
    pub fn build(self) -> MemberRc {
        let named = self
            .ty
            .as_named()
            .expect("properties can only be declared on named types");
        let container = named.self_ref();

        let get_method = self.get_method.clone().or_else(|| {
            self.wants_getter.then(|| {
                let accessor = synthesize_accessor(
                    &self.ids,
                    &container,
                    format!("get_{}", self.name),
                    MethodKind::PropertyGet,
                    self.parameters.clone(),
                    self.property_type.clone(),
                    self.is_static,
                    self.is_virtual,
                    self.accessibility,
                );
                named.declared_members.push(accessor.clone());
                accessor
            })
        });
        let set_method = self.set_method.clone().or_else(|| {
            self.wants_setter.then(|| {
                let mut parameters = self.parameters.clone();
                parameters.push(ParameterSymbol::new("value", self.property_type.clone()));
                let accessor = synthesize_accessor(
                    &self.ids,
                    &container,
                    format!("set_{}", self.name),
                    MethodKind::PropertySet,
                    parameters,
                    ModifiedType::bare(self.void.clone()),
                    self.is_static,
                    self.is_virtual,
                    self.accessibility,
                );
                named.declared_members.push(accessor.clone());
                accessor
            })
        });

        let member: MemberRc = Arc::new(MemberSymbol::Property(PropertySymbol {
            id: self.ids.next(),
            name: self.name,
            ty: self.property_type,
            parameters: self.parameters,
            get_method,
            set_method,
            is_static: self.is_static,
            accessibility: self.accessibility,
            containing_type: container,
        }));
        named.declared_members.push(member.clone());
        member
    }
}

/// Builder for an event member. Both accessors always exist; they are
/// synthesized unless supplied prebuilt.
pub struct EventBuilder {
    ids: IdAllocator,
    void: TypeRc,
    ty: TypeRc,
    name: String,
    handler_type: ModifiedType,
    add_method: Option<MemberRc>,
    remove_method: Option<MemberRc>,
    is_static: bool,
    is_virtual: bool,
    accessibility: Accessibility,
}

impl EventBuilder {
    /// Starts a new event with delegate type `handler_type` on `ty`.
    #[must_use]
    pub fn new(
        graph: &SymbolGraph,
        ty: &TypeRc,
        name: impl Into<String>,
        handler_type: ModifiedType,
    ) -> Self {
        Self {
            ids: graph.ids.clone(),
            void: graph.primitive(SpecialKind::Void),
            ty: ty.clone(),
            name: name.into(),
            handler_type,
            add_method: None,
            remove_method: None,
            is_static: false,
            is_virtual: false,
            accessibility: Accessibility::Public,
        }
    }

    /// Uses a prebuilt adder accessor instead of synthesizing one.
    #[must_use]
    pub fn with_add_method(mut self, accessor: MemberRc) -> Self {
        self.add_method = Some(accessor);
        self
    }

    /// Uses a prebuilt remover accessor instead of synthesizing one.
    #[must_use]
    pub fn with_remove_method(mut self, accessor: MemberRc) -> Self {
        self.remove_method = Some(accessor);
        self
    }

    /// Marks the event and its synthesized accessors static.
    #[must_use]
    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Marks synthesized accessors virtual.
    #[must_use]
    pub fn virtual_accessors(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    /// Sets the declared accessibility (default: public).
    #[must_use]
    pub fn accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    /// Creates the event symbol and appends it, together with any synthesized
    /// accessor methods, to the containing type's member list.
    ///
    /// # Panics
    /// Panics if the containing type is not a named type definition.
    #[must_use]
    pub fn build(self) -> MemberRc {
        let named = self
            .ty
            .as_named()
            .expect("events can only be declared on named types");
        let container = named.self_ref();

        let synthesize = |prebuilt: &Option<MemberRc>, prefix: &str, kind: MethodKind| {
            prebuilt.clone().unwrap_or_else(|| {
                let accessor = synthesize_accessor(
                    &self.ids,
                    &container,
                    format!("{prefix}_{}", self.name),
                    kind,
                    vec![ParameterSymbol::new("value", self.handler_type.clone())],
                    ModifiedType::bare(self.void.clone()),
                    self.is_static,
                    self.is_virtual,
                    self.accessibility,
                );
                named.declared_members.push(accessor.clone());
                accessor
            })
        };
        let add_method = synthesize(&self.add_method, "add", MethodKind::EventAdd);
        let remove_method = synthesize(&self.remove_method, "remove", MethodKind::EventRemove);

        let member: MemberRc = Arc::new(MemberSymbol::Event(EventSymbol {
            id: self.ids.next(),
            name: self.name,
            ty: self.handler_type,
            add_method: Some(add_method),
            remove_method: Some(remove_method),
            is_static: self.is_static,
            accessibility: self.accessibility,
            containing_type: container,
        }));
        named.declared_members.push(member.clone());
        member
    }
}

#[allow(clippy::too_many_arguments)]
fn synthesize_accessor(
    ids: &IdAllocator,
    container: &crate::symbols::TypeRef,
    name: String,
    kind: MethodKind,
    parameters: Vec<ParameterSymbol>,
    return_type: ModifiedType,
    is_static: bool,
    is_virtual: bool,
    accessibility: Accessibility,
) -> MemberRc {
    Arc::new(MemberSymbol::Method(MethodSymbol {
        id: ids.next(),
        name,
        kind,
        type_parameters: Vec::new(),
        parameters,
        return_type,
        is_static,
        is_virtual,
        is_override: false,
        accessibility,
        containing_type: container.clone(),
        overridden: OnceLock::new(),
        explicit_implementations: Arc::new(boxcar::Vec::new()),
        forwards_to: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::RefKind;

    #[test]
    fn test_type_builder_wires_parameters() {
        let graph = SymbolGraph::new();
        let ty = TypeBuilder::new(&graph, "Demo", "Pair`2")
            .type_param("TKey")
            .type_param("TValue")
            .build();

        let named = ty.as_named().unwrap();
        assert!(named.is_definition());
        assert_eq!(named.type_parameters.len(), 2);
        assert_eq!(named.type_arguments.len(), 2);

        let second = named.type_parameters[1].as_parameter().unwrap();
        assert_eq!(second.name, "TValue");
        assert_eq!(second.key.declaration, ty.id());
        assert_eq!(second.key.index, 1);
        assert_eq!(second.key.owner_kind, ParamOwnerKind::Type);
    }

    #[test]
    fn test_lazy_base_cycle_observes_sentinel() {
        use std::sync::Mutex;

        let graph = SymbolGraph::new();

        // The thunk reads the type's own base back, a declaration cycle. The
        // re-entrant read observes the error sentinel instead of recursing.
        let slot: Arc<Mutex<Option<TypeRc>>> = Arc::new(Mutex::new(None));
        let cyclic = TypeBuilder::new(&graph, "Demo", "Cyclic")
            .base_lazy({
                let slot = Arc::clone(&slot);
                move || {
                    let this = slot.lock().unwrap().clone().unwrap();
                    this.as_named().unwrap().base_type()
                }
            })
            .build();
        *slot.lock().unwrap() = Some(cyclic.clone());

        let base = cyclic.as_named().unwrap().base_type().unwrap();
        assert!(base.is_error());
    }

    #[test]
    fn test_method_builder_appends_to_member_list() {
        let graph = SymbolGraph::new();
        let ty = TypeBuilder::new(&graph, "Demo", "Calc").build();
        let int32 = ModifiedType::bare(graph.primitive(SpecialKind::I4));

        let method = MethodBuilder::new(&graph, &ty, "Add")
            .param(ParameterSymbol::new("a", int32.clone()))
            .param(ParameterSymbol::new("b", int32.clone()).with_ref_kind(RefKind::Ref))
            .returns(int32)
            .build();

        let members = ty.as_named().unwrap().members();
        assert_eq!(members.count(), 1);
        let found = method.as_method().unwrap();
        assert_eq!(found.parameters.len(), 2);
        assert_eq!(found.parameters[1].ref_kind, RefKind::Ref);
        assert_eq!(found.containing_type.id(), Some(ty.id()));
    }

    #[test]
    fn test_method_type_params_carry_method_key() {
        let graph = SymbolGraph::new();
        let ty = TypeBuilder::new(&graph, "Demo", "Util").build();

        let mut builder = MethodBuilder::new(&graph, &ty, "Identity");
        let t = builder.add_type_param("T");
        let method = builder
            .param(ParameterSymbol::new("value", ModifiedType::bare(t.clone())))
            .returns(ModifiedType::bare(t.clone()))
            .build();

        let key = t.as_parameter().unwrap().key;
        assert_eq!(key.owner_kind, ParamOwnerKind::Method);
        assert_eq!(key.declaration, method.id());
        assert_eq!(method.as_method().unwrap().arity(), 1);
    }

    #[test]
    fn test_explicit_impl_switches_kind() {
        let graph = SymbolGraph::new();
        let iface = TypeBuilder::new(&graph, "Demo", "IRun")
            .kind(TypeKind::Interface)
            .build();
        let slot = MethodBuilder::new(&graph, &iface, "Run").virtual_method().build();

        let class = TypeBuilder::new(&graph, "Demo", "Runner")
            .implements(iface.clone())
            .build();
        let explicit = MethodBuilder::new(&graph, &class, "Demo.IRun.Run")
            .explicit_impl(&slot)
            .build();

        let method = explicit.as_method().unwrap();
        assert!(method.is_explicit_implementation());
        assert!(method.explicitly_implements(slot.id()));
    }

    #[test]
    fn test_property_builder_synthesizes_accessors() {
        let graph = SymbolGraph::new();
        let ty = TypeBuilder::new(&graph, "Demo", "Box").build();
        let int32 = ModifiedType::bare(graph.primitive(SpecialKind::I4));

        let property = PropertyBuilder::new(&graph, &ty, "Count", int32)
            .getter()
            .setter()
            .build();

        let prop = property.as_property().unwrap();
        assert_eq!(prop.accessors().count(), 2);
        let getter = prop.get_method.as_ref().unwrap().as_method().unwrap();
        assert_eq!(getter.name, "get_Count");
        assert_eq!(getter.kind, MethodKind::PropertyGet);
        let setter = prop.set_method.as_ref().unwrap().as_method().unwrap();
        assert_eq!(setter.parameters.len(), 1);

        // Accessors are members in their own right, plus the wrapper.
        assert_eq!(ty.as_named().unwrap().members().count(), 3);
    }

    #[test]
    fn test_event_builder_synthesizes_both_accessors() {
        let graph = SymbolGraph::new();
        let ty = TypeBuilder::new(&graph, "Demo", "Button").build();
        let handler = TypeBuilder::new(&graph, "Demo", "Handler")
            .kind(TypeKind::Delegate)
            .build();

        let event = EventBuilder::new(&graph, &ty, "Click", ModifiedType::bare(handler)).build();

        let payload = event.as_event().unwrap();
        assert_eq!(payload.accessors().count(), 2);
        let adder = payload.add_method.as_ref().unwrap().as_method().unwrap();
        assert_eq!(adder.name, "add_Click");
        assert_eq!(adder.kind, MethodKind::EventAdd);
        assert_eq!(ty.as_named().unwrap().members().count(), 3);
    }
}
