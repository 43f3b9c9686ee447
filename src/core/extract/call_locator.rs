//! Locating utility-library calls in a parsed module.
//!
//! Runs in two passes: [`BindingCollector`] records which local names refer
//! to a configured library (ES imports and CommonJS `require`), then
//! [`CallLocator`] records every call through one of those names.

use std::collections::HashMap;
use std::sync::Arc;

use swc_common::{BytePos, SourceMap, Spanned};
use swc_ecma_ast::{
    CallExpr, Callee, Expr, ImportDecl, ImportSpecifier, Lit, MemberProp, ModuleExportName,
    ObjectPatProp, Pat, PropName, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};
use tracing::trace;

use crate::autofix::CallInfo;
use crate::autofix::tokenizer::{CodeScanner, find_closing_parenthesis};
use crate::catalogue::Catalogue;
use crate::core::parsers::ParsedSource;
use crate::core::{SourceContext, SourceLocation};

/// Byte offsets of a located call within its file's source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedCallInfo {
    pub call_start: usize,
    pub call_end: usize,
    pub open_paren: usize,
    pub close_paren: usize,
}

impl OwnedCallInfo {
    /// View over `full_text`, the text the offsets were computed from.
    pub fn borrow<'a>(&self, full_text: &'a str) -> Option<CallInfo<'a>> {
        let params = full_text.get(self.open_paren + 1..self.close_paren)?;
        Some(CallInfo::new(
            self.call_start,
            self.call_end,
            params,
            full_text,
        ))
    }
}

/// A call of a catalogued library function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedCall {
    /// Canonical catalogue name, e.g. `groupBy`.
    pub function_name: String,
    pub context: SourceContext,
    /// `None` when the call's text cannot be mapped back to its parentheses.
    pub call: Option<OwnedCallInfo>,
}

/// Find every call of a catalogued function made through a `libraries` binding.
pub fn locate_calls(
    parsed: &ParsedSource,
    file_path: &str,
    libraries: &[String],
    catalogue: &Catalogue,
) -> Vec<LocatedCall> {
    let mut collector = BindingCollector {
        libraries,
        catalogue,
        bindings: HashMap::new(),
    };
    parsed.module.visit_with(&mut collector);
    if collector.bindings.is_empty() {
        return Vec::new();
    }

    let mut locator = CallLocator {
        file_path,
        source_map: &parsed.source_map,
        code: parsed.code(),
        start_pos: parsed.source_file.start_pos,
        bindings: collector.bindings,
        catalogue,
        calls: Vec::new(),
    };
    parsed.module.visit_with(&mut locator);
    locator.calls
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Binding {
    /// The whole library, as `_` in `import _ from "lodash"`.
    Namespace,
    /// One function, by canonical name.
    Function(String),
}

/// What a module specifier refers to.
#[derive(Debug, PartialEq, Eq)]
enum LibraryModule<'a> {
    Whole,
    /// Per-method module: `lodash/map`, `lodash-es/map` or `lodash.map`.
    Method(&'a str),
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn classify_module<'a>(specifier: &'a str, libraries: &[String]) -> Option<LibraryModule<'a>> {
    if libraries.iter().any(|lib| lib == specifier) {
        return Some(LibraryModule::Whole);
    }
    libraries.iter().find_map(|lib| {
        let rest = specifier.strip_prefix(lib.as_str())?;
        let method = rest.strip_prefix('/').or_else(|| rest.strip_prefix('.'))?;
        // `lodash/fp` reorders arguments; none of its functions map 1:1.
        (is_identifier(method) && method != "fp").then_some(LibraryModule::Method(method))
    })
}

fn export_name(name: &ModuleExportName) -> String {
    match name {
        ModuleExportName::Ident(ident) => ident.sym.to_string(),
        ModuleExportName::Str(s) => s.value.to_string_lossy().to_string(),
    }
}

/// Module specifier of `require("...")`.
fn require_specifier(expr: &Expr) -> Option<String> {
    let Expr::Call(call) = expr else {
        return None;
    };
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let Expr::Ident(ident) = &**callee else {
        return None;
    };
    if &*ident.sym != "require" {
        return None;
    }
    let [arg] = call.args.as_slice() else {
        return None;
    };
    match (&arg.spread, &*arg.expr) {
        (None, Expr::Lit(Lit::Str(s))) => s.value.as_str().map(str::to_string),
        _ => None,
    }
}

fn binding_name(pat: &Pat) -> Option<String> {
    match pat {
        Pat::Ident(ident) => Some(ident.id.sym.to_string()),
        Pat::Assign(assign) => binding_name(&assign.left),
        _ => None,
    }
}

struct BindingCollector<'a> {
    libraries: &'a [String],
    catalogue: &'a Catalogue,
    bindings: HashMap<String, Binding>,
}

impl BindingCollector<'_> {
    fn bind_function(&mut self, local: String, exported: &str, ignore_case: bool) {
        let entry = if ignore_case {
            self.catalogue.find_ignore_case(exported)
        } else {
            self.catalogue.get(exported)
        };
        if let Some(entry) = entry {
            self.bindings
                .insert(local, Binding::Function(entry.name.clone()));
        }
    }

    /// Bind the default export (or whole `require` result) of `specifier`.
    fn bind_default(&mut self, local: String, specifier: &str) {
        match classify_module(specifier, self.libraries) {
            Some(LibraryModule::Whole) => {
                self.bindings.insert(local, Binding::Namespace);
            }
            Some(LibraryModule::Method(method)) => self.bind_function(local, method, true),
            None => {}
        }
    }

    fn bind_destructured(&mut self, pat: &Pat, specifier: &str) {
        if classify_module(specifier, self.libraries) != Some(LibraryModule::Whole) {
            return;
        }
        let Pat::Object(obj_pat) = pat else {
            return;
        };
        for prop in &obj_pat.props {
            match prop {
                ObjectPatProp::Assign(assign) => {
                    let name = assign.key.sym.to_string();
                    self.bind_function(name.clone(), &name, false);
                }
                ObjectPatProp::KeyValue(kv) => {
                    let exported = match &kv.key {
                        PropName::Ident(ident) => ident.sym.to_string(),
                        PropName::Str(s) => s.value.to_string_lossy().to_string(),
                        _ => continue,
                    };
                    if let Some(local) = binding_name(&kv.value) {
                        self.bind_function(local, &exported, false);
                    }
                }
                ObjectPatProp::Rest(_) => {}
            }
        }
    }
}

impl Visit for BindingCollector<'_> {
    fn visit_import_decl(&mut self, node: &ImportDecl) {
        if node.type_only {
            return;
        }
        let Some(specifier) = node.src.value.as_str() else {
            return;
        };
        let Some(module) = classify_module(specifier, self.libraries) else {
            return;
        };

        for spec in &node.specifiers {
            match spec {
                ImportSpecifier::Default(default) => {
                    self.bind_default(default.local.sym.to_string(), specifier)
                }
                ImportSpecifier::Namespace(ns) if module == LibraryModule::Whole => {
                    self.bindings
                        .insert(ns.local.sym.to_string(), Binding::Namespace);
                }
                ImportSpecifier::Named(named) if !named.is_type_only => {
                    let local = named.local.sym.to_string();
                    match (&module, &named.imported) {
                        (LibraryModule::Whole, Some(imported)) => {
                            self.bind_function(local, &export_name(imported), false)
                        }
                        (LibraryModule::Whole, None) => {
                            self.bind_function(local.clone(), &local, false)
                        }
                        // `import { default as map } from "lodash/map"`
                        (LibraryModule::Method(method), Some(imported))
                            if export_name(imported) == "default" =>
                        {
                            self.bind_function(local, method, true)
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        if let Some(init) = &node.init {
            if let Some(specifier) = require_specifier(init) {
                // const _ = require("lodash") / const { map } = require("lodash")
                if let Pat::Object(_) = &node.name {
                    self.bind_destructured(&node.name, &specifier);
                } else if let Some(local) = binding_name(&node.name) {
                    self.bind_default(local, &specifier);
                }
            } else if let Expr::Member(member) = &**init
                && let Some(specifier) = require_specifier(&member.obj)
                && classify_module(&specifier, self.libraries) == Some(LibraryModule::Whole)
                && let MemberProp::Ident(prop) = &member.prop
                && let Some(local) = binding_name(&node.name)
            {
                // const map = require("lodash").map
                self.bind_function(local, &prop.sym, false);
            }
        }
        node.visit_children_with(self);
    }
}

struct CallLocator<'a> {
    file_path: &'a str,
    source_map: &'a Arc<SourceMap>,
    code: &'a str,
    start_pos: BytePos,
    bindings: HashMap<String, Binding>,
    catalogue: &'a Catalogue,
    calls: Vec<LocatedCall>,
}

impl CallLocator<'_> {
    /// Canonical function name called by `callee`, if it is a library call.
    fn resolve_callee(&self, callee: &Callee) -> Option<String> {
        let Callee::Expr(expr) = callee else {
            return None;
        };
        match &**expr {
            Expr::Ident(ident) => match self.bindings.get(&*ident.sym)? {
                Binding::Function(name) => Some(name.clone()),
                Binding::Namespace => None,
            },
            Expr::Member(member) => {
                let Expr::Ident(obj) = &*member.obj else {
                    return None;
                };
                let MemberProp::Ident(prop) = &member.prop else {
                    return None;
                };
                if self.bindings.get(&*obj.sym) != Some(&Binding::Namespace) {
                    return None;
                }
                self.catalogue
                    .get(&prop.sym)
                    .map(|entry| entry.name.clone())
            }
            _ => None,
        }
    }

    fn offset(&self, pos: BytePos) -> Option<usize> {
        pos.0.checked_sub(self.start_pos.0).map(|o| o as usize)
    }

    /// Offsets of the call and its argument parentheses.
    ///
    /// The opening parenthesis is the first `(` after the callee and any
    /// type arguments; its match must close the call.
    fn call_offsets(&self, node: &CallExpr) -> Option<OwnedCallInfo> {
        let Callee::Expr(callee) = &node.callee else {
            return None;
        };
        let mut head_end = callee.span().hi;
        if let Some(type_args) = &node.type_args {
            head_end = head_end.max(type_args.span.hi);
        }

        let call_start = self.offset(node.span.lo)?;
        let call_end = self.offset(node.span.hi)?;
        let head_end = self.offset(head_end)?;

        let open_paren = head_end
            + CodeScanner::new(self.code.get(head_end..call_end)?)
                .find(|b| b.byte == b'(')?
                .index;
        let close_paren = find_closing_parenthesis(self.code, open_paren)?;

        (close_paren + 1 == call_end).then_some(OwnedCallInfo {
            call_start,
            call_end,
            open_paren,
            close_paren,
        })
    }

    fn record(&mut self, node: &CallExpr, function_name: String) {
        let loc = self.source_map.lookup_char_pos(node.span.lo);
        let source_line = loc
            .file
            .get_line(loc.line - 1)
            .map(|cow| cow.to_string())
            .unwrap_or_default();
        let location = SourceLocation::new(self.file_path, loc.line, loc.col_display + 1);
        let call = self.call_offsets(node);

        trace!(
            file = self.file_path,
            line = loc.line,
            function = function_name.as_str(),
            fixable = call.is_some(),
            "located library call"
        );
        self.calls.push(LocatedCall {
            function_name,
            context: SourceContext::new(location, source_line),
            call,
        });
    }
}

impl Visit for CallLocator<'_> {
    fn visit_call_expr(&mut self, node: &CallExpr) {
        if let Some(name) = self.resolve_callee(&node.callee) {
            self.record(node, name);
        }
        node.visit_children_with(self);
    }
}
