//! Bridge synthesis: forwarding members that reconcile source and binary
//! dispatch.
//!
//! A source-level implicit implementation can fail to occupy its interface
//! slot at the binary level: its signature may differ from the slot's in
//! facets dispatch can see (custom modifiers, array bounds), or a hidden
//! base-chain declaration with the same dispatch signature would receive the
//! call instead. In both cases a bridge is synthesized: an explicit-kind
//! member on the implementing type, carrying the slot's exact signature and
//! forwarding to the resolved implementation.
//!
//! Resolution itself requests a bridge whenever it picks an implementer that
//! cannot occupy the slot on its own, so single-slot queries observe bridges
//! without a bulk pass; [`SymbolGraph::synthesize_all_bridges`] drives
//! resolution over whole type sets in parallel and reports unimplemented
//! slots on concrete types.
//!
//! Bridges are synthesized at most once per `(type, interface member)` pair;
//! racing threads build redundantly and first-writer-wins on the graph's
//! bridge cache. Distinct interface slots never share a bridge, even when
//! they forward to the same target.

use std::sync::{Arc, OnceLock};

use dashmap::mapref::entry::Entry;
use rayon::prelude::*;

use crate::compare::TypeComparer;
use crate::diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity};
use crate::error::Error;
use crate::graph::CancellationToken;
use crate::resolve::{all_interfaces, base_chain, overrides_transitively};
use crate::symbols::{
    Accessibility, MemberRc, MemberRef, MemberSymbol, MethodKind, MethodSymbol, NamedType, TypeRc,
};
use crate::{Result, SymbolGraph};

impl SymbolGraph {
    /// Resolves every interface slot of every type in `types` in parallel,
    /// synthesizing bridge members where source and binary dispatch disagree.
    ///
    /// Cancellation is observed once per type; a cancelled run leaves already
    /// published cache entries valid and no partial entries behind.
    ///
    /// # Errors
    /// Returns [`Error::Cancelled`] if `token` is signalled mid-run.
    pub fn synthesize_all_bridges(
        &self,
        types: &[TypeRc],
        token: &CancellationToken,
    ) -> Result<()> {
        types.par_iter().try_for_each(|ty| {
            if token.is_cancelled() {
                return Err(Error::Cancelled);
            }
            self.synthesize_bridges_for(ty);
            Ok(())
        })
    }

    fn synthesize_bridges_for(&self, ty: &TypeRc) {
        let Some(named) = ty.as_named() else {
            return;
        };
        if named.is_interface() {
            return;
        }

        for iface in all_interfaces(ty) {
            let Some(iface_named) = iface.as_named() else {
                continue;
            };
            for (_, member) in iface_named.members().iter() {
                let Some(slot) = member.as_method() else {
                    continue;
                };
                if slot.is_static || slot.kind == MethodKind::Constructor {
                    continue;
                }
                match self.find_implementation_for_interface_member(ty, member) {
                    None if !named.is_abstract => {
                        self.diagnostics().push(
                            Diagnostic::new(
                                DiagnosticSeverity::Error,
                                DiagnosticCategory::Resolution,
                                format!("{ty} does not implement {member}"),
                            )
                            .with_type(ty.id())
                            .with_member(member.id()),
                        );
                    }
                    None => {}
                    // Resolution requests any bridge the slot needs; the scan
                    // only has to drive it.
                    Some(_) => {}
                }
            }
        }
    }

    /// Creates (or returns the already published) bridge for one slot.
    pub(super) fn synthesize_bridge(
        &self,
        ty: &TypeRc,
        named: &NamedType,
        interface_member: &MemberRc,
        slot: &MethodSymbol,
        target: &MemberRc,
    ) -> MemberRc {
        let key = (ty.id(), interface_member.id());
        if let Some(existing) = self.bridges.get(&key) {
            return existing.clone();
        }

        let qualified = interface_member
            .containing_type()
            .upgrade()
            .map(|container| container.to_string())
            .unwrap_or_default();

        let explicit_implementations = Arc::new(boxcar::Vec::new());
        explicit_implementations.push(MemberRef::new(interface_member));

        let bridge: MemberRc = Arc::new(MemberSymbol::Method(MethodSymbol {
            id: self.ids.next(),
            name: format!("{qualified}.{}", slot.name),
            kind: MethodKind::ExplicitInterfaceImplementation,
            type_parameters: slot.type_parameters.clone(),
            parameters: slot.parameters.clone(),
            return_type: slot.return_type.clone(),
            is_static: false,
            is_virtual: true,
            is_override: false,
            accessibility: Accessibility::Private,
            containing_type: named.self_ref(),
            overridden: OnceLock::new(),
            explicit_implementations,
            forwards_to: Some(MemberRef::new(target)),
        }));

        match self.bridges.entry(key) {
            Entry::Occupied(existing) => existing.get().clone(),
            Entry::Vacant(vacant) => {
                vacant.insert(bridge.clone());
                self.bridge_lists
                    .entry(ty.id())
                    .or_insert_with(|| Arc::new(boxcar::Vec::new()))
                    .push(bridge.clone());
                bridge
            }
        }
    }
}

/// Decides whether the resolved implementation occupies the slot by itself.
pub(super) fn needs_bridge(slot: &MethodSymbol, target: &MemberRc) -> bool {
    let Some(chosen) = target.as_method() else {
        return false;
    };
    // Explicit implementations (and earlier bridges) already own an exact
    // slot entry.
    if chosen.is_explicit_implementation() || chosen.explicit_implementations.count() > 0 {
        return false;
    }

    // The signatures agree for dispatch but differ in facets the binary
    // records; the slot needs an exact-signature entry.
    if !TypeComparer::CONSIDER_EVERYTHING.same_signature(chosen, slot) {
        return true;
    }

    // A hidden (not overridden) base declaration with the same dispatch
    // signature would receive the call without an exact entry.
    let Some(home) = chosen.containing_type.upgrade() else {
        return false;
    };
    let comparer = TypeComparer::IGNORE_MODIFIERS_AND_ARRAY_BOUNDS;
    for ancestor in base_chain(&home).into_iter().skip(1) {
        let Some(ancestor_named) = ancestor.as_named() else {
            continue;
        };
        for (_, member) in ancestor_named.members().iter() {
            let Some(method) = member.as_method() else {
                continue;
            };
            if method.is_virtual
                && method.name == chosen.name
                && comparer.same_signature(method, chosen)
                && !overrides_transitively(chosen, member.id())
            {
                return true;
            }
        }
    }
    false
}
