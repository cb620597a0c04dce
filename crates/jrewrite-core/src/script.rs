//! Edit scripts
//!
//! An edit script is a JSON list of refactorings addressed by type and
//! method name. [`apply_script`] records them on one [`AstRewrite`] and
//! synthesizes a single set of text edits, so unrelated code is untouched.
//!
//! ```json
//! {
//!   "description": "rename and log",
//!   "operations": [
//!     { "op": "renameMethod", "typeName": "Service", "method": "run", "newName": "execute" },
//!     { "op": "insertStatement", "typeName": "Service", "method": "run", "code": "log();", "index": 0 }
//!   ]
//! }
//! ```

use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::format::CodeFormatter;
use crate::rewrite::{AstRewrite, Node, NodeFactory, PropertyDescriptor, TextEdit};
use crate::syntax::ast::{
    AstNode, Block, CompilationUnit, MethodCall, MethodDecl, Modifier, Parameter, PrimitiveType, QualifiedName,
    SimpleName, SimpleType, TypeDecl,
};
use crate::syntax::{JavaSyntaxKind, JavaSyntaxNode, NodeClass, parse_java};
use crate::{Result, RewriteError};

/// A sequence of refactorings applied to one compilation unit
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditScript {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Operation {
    /// Rename a method and its unqualified or `this.` calls inside the type
    #[serde(rename_all = "camelCase")]
    RenameMethod {
        type_name: String,
        method: String,
        new_name: String,
    },
    #[serde(rename_all = "camelCase")]
    RemoveMethod {
        type_name: String,
        method: String,
    },
    /// Add a parameter, appended unless `index` is given
    #[serde(rename_all = "camelCase")]
    AddParameter {
        type_name: String,
        method: String,
        param_type: String,
        name: String,
        #[serde(default)]
        index: Option<usize>,
    },
    #[serde(rename_all = "camelCase")]
    RemoveParameter {
        type_name: String,
        method: String,
        name: String,
    },
    /// Reorder parameters; `order` lists every parameter name once
    #[serde(rename_all = "camelCase")]
    ReorderParameters {
        type_name: String,
        method: String,
        order: Vec<String>,
    },
    /// Insert a statement into the method body, appended unless `index` is given
    #[serde(rename_all = "camelCase")]
    InsertStatement {
        type_name: String,
        method: String,
        code: String,
        #[serde(default)]
        index: Option<usize>,
    },
    #[serde(rename_all = "camelCase")]
    RemoveStatement {
        type_name: String,
        method: String,
        index: usize,
    },
    /// Add a modifier to a method, or to the type when `method` is omitted
    #[serde(rename_all = "camelCase")]
    AddModifier {
        type_name: String,
        #[serde(default)]
        method: Option<String>,
        keyword: String,
    },
    #[serde(rename_all = "camelCase")]
    RemoveModifier {
        type_name: String,
        #[serde(default)]
        method: Option<String>,
        keyword: String,
    },
    #[serde(rename_all = "camelCase")]
    SetReturnType {
        type_name: String,
        method: String,
        return_type: String,
    },
    #[serde(rename_all = "camelCase")]
    AddThrows {
        type_name: String,
        method: String,
        exception: String,
    },
    #[serde(rename_all = "camelCase")]
    RemoveThrows {
        type_name: String,
        method: String,
        exception: String,
    },
    /// Rename every use of a local variable or parameter inside a method
    #[serde(rename_all = "camelCase")]
    RenameLocal {
        type_name: String,
        method: String,
        from: String,
        to: String,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::RenameMethod { .. } => "renameMethod",
            Operation::RemoveMethod { .. } => "removeMethod",
            Operation::AddParameter { .. } => "addParameter",
            Operation::RemoveParameter { .. } => "removeParameter",
            Operation::ReorderParameters { .. } => "reorderParameters",
            Operation::InsertStatement { .. } => "insertStatement",
            Operation::RemoveStatement { .. } => "removeStatement",
            Operation::AddModifier { .. } => "addModifier",
            Operation::RemoveModifier { .. } => "removeModifier",
            Operation::SetReturnType { .. } => "setReturnType",
            Operation::AddThrows { .. } => "addThrows",
            Operation::RemoveThrows { .. } => "removeThrows",
            Operation::RenameLocal { .. } => "renameLocal",
        }
    }

    /// Name of the type the operation addresses
    pub fn type_name(&self) -> &str {
        match self {
            Operation::RenameMethod { type_name, .. }
            | Operation::RemoveMethod { type_name, .. }
            | Operation::AddParameter { type_name, .. }
            | Operation::RemoveParameter { type_name, .. }
            | Operation::ReorderParameters { type_name, .. }
            | Operation::InsertStatement { type_name, .. }
            | Operation::RemoveStatement { type_name, .. }
            | Operation::AddModifier { type_name, .. }
            | Operation::RemoveModifier { type_name, .. }
            | Operation::SetReturnType { type_name, .. }
            | Operation::AddThrows { type_name, .. }
            | Operation::RemoveThrows { type_name, .. }
            | Operation::RenameLocal { type_name, .. } => type_name,
        }
    }
}

impl EditScript {
    /// Parse a script; comments and trailing commas are accepted
    pub fn from_json(text: &str) -> Result<Self> {
        json5::from_str(text).map_err(|e| RewriteError::script_error("parse", e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| RewriteError::io_error(path, e))?;
        Self::from_json(&text)
    }

    /// The operations whose type is declared in `source`
    ///
    /// Lets one script run over a source tree where each file declares
    /// only some of the addressed types.
    pub fn targeting(&self, source: &str) -> EditScript {
        let (cst, _) = parse_java(source);
        let declared = |name: &str| {
            CompilationUnit::cast(cst.clone()).is_some_and(|unit| unit.find_type(name).is_some())
        };
        EditScript {
            description: self.description.clone(),
            operations: self
                .operations
                .iter()
                .filter(|operation| declared(operation.type_name()))
                .cloned()
                .collect(),
        }
    }
}

/// Result of running a script over one source
#[derive(Debug, Clone, Serialize)]
pub struct ScriptOutcome {
    pub text: String,
    pub edits: Vec<TextEdit>,
    /// Operations that changed something
    pub applied: usize,
}

impl ScriptOutcome {
    pub fn has_changes(&self) -> bool {
        !self.edits.is_empty()
    }
}

/// Run `script` over `source`
pub fn apply_script(source: &str, script: &EditScript, formatter: &dyn CodeFormatter) -> Result<ScriptOutcome> {
    let (cst, errors) = parse_java(source);
    if !errors.is_empty() {
        warn!(errors = errors.len(), "source has syntax errors, unparsed regions are kept verbatim");
    }
    let unit = CompilationUnit::cast(cst.clone())
        .ok_or_else(|| RewriteError::internal_error("parser did not produce a compilation unit"))?;

    let mut runner = ScriptRunner {
        rewrite: AstRewrite::new(cst),
        factory: NodeFactory::new(),
        unit,
    };
    let mut applied = 0;
    for operation in &script.operations {
        debug!(op = operation.name(), "applying operation");
        if runner.apply(operation)? {
            applied += 1;
        }
    }

    let result = runner.rewrite.rewrite_with(formatter)?;
    let edits = result.edits().to_vec();
    Ok(ScriptOutcome {
        text: result.into_text(),
        edits,
        applied,
    })
}

struct ScriptRunner {
    rewrite: AstRewrite,
    factory: NodeFactory,
    unit: CompilationUnit,
}

/// Canonical modifier order; annotations come first
const MODIFIER_ORDER: [&str; 12] = [
    "public",
    "protected",
    "private",
    "abstract",
    "static",
    "final",
    "transient",
    "volatile",
    "synchronized",
    "native",
    "strictfp",
    "default",
];

fn modifier_rank(keyword: Option<&str>) -> usize {
    keyword
        .and_then(|k| MODIFIER_ORDER.iter().position(|m| *m == k))
        .map_or(0, |p| p + 1)
}

impl ScriptRunner {
    /// Record one operation; `false` when it had nothing to do
    fn apply(&mut self, operation: &Operation) -> Result<bool> {
        let op = operation.name();
        match operation {
            Operation::RenameMethod {
                type_name,
                method,
                new_name,
            } => {
                let ty = self.find_type(op, type_name)?;
                let decl = self.find_method(op, &ty, method)?;
                let name = decl
                    .name()
                    .ok_or_else(|| RewriteError::script_error(op, format!("method '{method}' has no name")))?;
                if method == new_name {
                    return Ok(false);
                }
                self.rewrite
                    .set_simple(name.syntax(), SimpleName::IDENTIFIER, new_name)?;

                let calls: Vec<JavaSyntaxNode> = ty
                    .syntax()
                    .descendants()
                    .filter_map(MethodCall::cast)
                    .filter(|call| call.name_text().as_deref() == Some(method.as_str()))
                    .filter(|call| {
                        call.receiver()
                            .is_none_or(|r| r.kind() == JavaSyntaxKind::ThisExpr)
                    })
                    .map(|call| call.syntax().clone())
                    .collect();
                for call in calls {
                    if let Some(Node::Original(name)) = self.rewrite.get_original(&call, MethodCall::NAME)?.as_child() {
                        self.rewrite.set_simple(name, SimpleName::IDENTIFIER, new_name)?;
                    }
                }
                Ok(true)
            }

            Operation::RemoveMethod { type_name, method } => {
                let ty = self.find_type(op, type_name)?;
                let decl = self.find_method(op, &ty, method)?;
                self.rewrite.remove(decl.syntax())?;
                Ok(true)
            }

            Operation::AddParameter {
                type_name,
                method,
                param_type,
                name,
                index,
            } => {
                let ty = self.find_type(op, type_name)?;
                let decl = self.find_method(op, &ty, method)?;
                let parameters = self.current_list(decl.syntax(), MethodDecl::PARAMETERS)?;
                if parameters.iter().any(|p| self.parameter_name(p).as_deref() == Some(name.as_str())) {
                    return Err(RewriteError::script_error(op, format!("parameter '{name}' already exists")));
                }
                let parameter = self
                    .factory
                    .parameter(self.factory.type_named(param_type)?, name)?;
                let mut list = self.rewrite.list(decl.syntax(), MethodDecl::PARAMETERS)?;
                match index {
                    Some(index) => list.insert_at(parameter, *index)?,
                    None => list.insert_last(parameter)?,
                }
                Ok(true)
            }

            Operation::RemoveParameter {
                type_name,
                method,
                name,
            } => {
                let ty = self.find_type(op, type_name)?;
                let decl = self.find_method(op, &ty, method)?;
                let parameter = self
                    .current_list(decl.syntax(), MethodDecl::PARAMETERS)?
                    .into_iter()
                    .find(|p| self.parameter_name(p).as_deref() == Some(name.as_str()))
                    .ok_or_else(|| RewriteError::script_error(op, format!("no parameter named '{name}'")))?;
                self.rewrite
                    .list(decl.syntax(), MethodDecl::PARAMETERS)?
                    .remove(&parameter)?;
                Ok(true)
            }

            Operation::ReorderParameters {
                type_name,
                method,
                order,
            } => {
                let ty = self.find_type(op, type_name)?;
                let decl = self.find_method(op, &ty, method)?;
                // Earlier operations may have added or removed parameters
                let parameters = self.current_list(decl.syntax(), MethodDecl::PARAMETERS)?;
                if order.len() != parameters.len() {
                    return Err(RewriteError::script_error(
                        op,
                        format!("expected {} parameter names, got {}", parameters.len(), order.len()),
                    ));
                }
                let mut reordered = Vec::with_capacity(order.len());
                for name in order {
                    let parameter = parameters
                        .iter()
                        .find(|p| self.parameter_name(p).as_deref() == Some(name.as_str()))
                        .ok_or_else(|| RewriteError::script_error(op, format!("no parameter named '{name}'")))?;
                    if reordered.contains(parameter) {
                        return Err(RewriteError::script_error(op, format!("parameter '{name}' listed twice")));
                    }
                    reordered.push(parameter.clone());
                }
                if reordered == parameters {
                    return Ok(false);
                }
                self.rewrite
                    .list(decl.syntax(), MethodDecl::PARAMETERS)?
                    .replace_all(reordered)?;
                Ok(true)
            }

            Operation::InsertStatement {
                type_name,
                method,
                code,
                index,
            } => {
                let ty = self.find_type(op, type_name)?;
                let decl = self.find_method(op, &ty, method)?;
                let body = self.find_body(op, &decl)?;
                let kind = statement_kind(code).map_err(|message| RewriteError::script_error(op, message))?;
                let statement = self.rewrite.create_string_placeholder(code.trim(), kind);
                let mut list = self.rewrite.list(body.syntax(), Block::STATEMENTS)?;
                match index {
                    Some(index) => list.insert_at(statement, *index)?,
                    None => list.insert_last(statement)?,
                }
                Ok(true)
            }

            Operation::RemoveStatement {
                type_name,
                method,
                index,
            } => {
                let ty = self.find_type(op, type_name)?;
                let decl = self.find_method(op, &ty, method)?;
                let body = self.find_body(op, &decl)?;
                let statements = self.current_list(body.syntax(), Block::STATEMENTS)?;
                let statement = statements.get(*index).ok_or(RewriteError::IndexOutOfBounds {
                    property: Block::STATEMENTS.to_string(),
                    index: *index,
                    len: statements.len(),
                })?;
                self.rewrite
                    .list(body.syntax(), Block::STATEMENTS)?
                    .remove(statement)?;
                Ok(true)
            }

            Operation::AddModifier {
                type_name,
                method,
                keyword,
            } => {
                let (owner, property) = self.modifier_target(op, type_name, method.as_deref())?;
                let present = self.current_list(&owner, property)?;
                if present.iter().any(|m| keyword_of(m).as_deref() == Some(keyword.as_str())) {
                    return Ok(false);
                }
                let modifier = self.factory.modifier(keyword)?;
                let rank = modifier_rank(Some(keyword));
                let mut list = self.rewrite.list(&owner, property)?;
                let position = list
                    .rewritten_list()
                    .iter()
                    .position(|node| node.kind() == JavaSyntaxKind::Modifier && modifier_rank(keyword_of(node).as_deref()) > rank);
                match position {
                    Some(position) => list.insert_at(modifier, position)?,
                    None => list.insert_last(modifier)?,
                }
                Ok(true)
            }

            Operation::RemoveModifier {
                type_name,
                method,
                keyword,
            } => {
                let (owner, property) = self.modifier_target(op, type_name, method.as_deref())?;
                let modifier = self
                    .current_list(&owner, property)?
                    .into_iter()
                    .find(|m| keyword_of(m).as_deref() == Some(keyword.as_str()))
                    .ok_or_else(|| RewriteError::script_error(op, format!("no '{keyword}' modifier")))?;
                self.rewrite.list(&owner, property)?.remove(&modifier)?;
                Ok(true)
            }

            Operation::SetReturnType {
                type_name,
                method,
                return_type,
            } => {
                let ty = self.find_type(op, type_name)?;
                let decl = self.find_method(op, &ty, method)?;
                if decl.return_type().is_none() {
                    return Err(RewriteError::script_error(op, format!("'{method}' is a constructor")));
                }
                let current = self.rewrite.get(decl.syntax(), MethodDecl::RETURN_TYPE)?;
                if current.as_child().and_then(type_text).as_deref() == Some(return_type.as_str()) {
                    return Ok(false);
                }
                let new_type = self.factory.type_named(return_type)?;
                self.rewrite
                    .set_child(decl.syntax(), MethodDecl::RETURN_TYPE, Some(new_type))?;
                Ok(true)
            }

            Operation::AddThrows {
                type_name,
                method,
                exception,
            } => {
                let ty = self.find_type(op, type_name)?;
                let decl = self.find_method(op, &ty, method)?;
                if self.thrown_type(&decl, exception)?.is_some() {
                    return Ok(false);
                }
                let thrown = self.factory.type_named(exception)?;
                self.rewrite
                    .list(decl.syntax(), MethodDecl::THROWN_EXCEPTION_TYPES)?
                    .insert_last(thrown)?;
                Ok(true)
            }

            Operation::RemoveThrows {
                type_name,
                method,
                exception,
            } => {
                let ty = self.find_type(op, type_name)?;
                let decl = self.find_method(op, &ty, method)?;
                let thrown = self
                    .thrown_type(&decl, exception)?
                    .ok_or_else(|| RewriteError::script_error(op, format!("'{method}' does not throw {exception}")))?;
                self.rewrite
                    .list(decl.syntax(), MethodDecl::THROWN_EXCEPTION_TYPES)?
                    .remove(&thrown)?;
                Ok(true)
            }

            Operation::RenameLocal {
                type_name,
                method,
                from,
                to,
            } => {
                let ty = self.find_type(op, type_name)?;
                let decl = self.find_method(op, &ty, method)?;
                let occurrences: Vec<JavaSyntaxNode> = decl
                    .syntax()
                    .descendants()
                    .filter_map(SimpleName::cast)
                    .filter(|name| name.identifier().as_deref() == Some(from.as_str()))
                    .map(|name| name.syntax().clone())
                    .filter(|name| is_variable_reference(name))
                    .collect();
                if occurrences.is_empty() {
                    return Err(RewriteError::script_error(op, format!("no occurrences of '{from}' in '{method}'")));
                }
                if from == to {
                    return Ok(false);
                }
                for name in &occurrences {
                    self.rewrite.set_simple(name, SimpleName::IDENTIFIER, to)?;
                }
                debug!(count = occurrences.len(), "renamed local occurrences");
                Ok(true)
            }
        }
    }

    fn find_type(&self, op: &str, name: &str) -> Result<TypeDecl> {
        self.unit
            .find_type(name)
            .ok_or_else(|| RewriteError::script_error(op, format!("type '{name}' not found")))
    }

    fn find_method(&self, op: &str, ty: &TypeDecl, name: &str) -> Result<MethodDecl> {
        ty.method(name)
            .ok_or_else(|| RewriteError::script_error(op, format!("method '{name}' not found")))
    }

    fn find_body(&self, op: &str, method: &MethodDecl) -> Result<Block> {
        method
            .body()
            .ok_or_else(|| RewriteError::script_error(op, "method has no body"))
    }

    fn modifier_target(
        &self,
        op: &str,
        type_name: &str,
        method: Option<&str>,
    ) -> Result<(JavaSyntaxNode, PropertyDescriptor)> {
        let ty = self.find_type(op, type_name)?;
        match method {
            Some(method) => {
                let decl = self.find_method(op, &ty, method)?;
                Ok((decl.syntax().clone(), MethodDecl::MODIFIERS))
            }
            None => Ok((ty.syntax().clone(), TypeDecl::MODIFIERS)),
        }
    }

    /// List elements with the operations recorded so far applied
    fn current_list(&self, parent: &JavaSyntaxNode, property: PropertyDescriptor) -> Result<Vec<Node>> {
        Ok(self.rewrite.get(parent, property)?.as_list().to_vec())
    }

    /// Current name of an original or inserted parameter
    fn parameter_name(&self, parameter: &Node) -> Option<String> {
        // Moved and copied parameters are named by their source
        let name = match parameter.as_original().or_else(|| parameter.placeholder_source()) {
            Some(original) => self.rewrite.get(original, Parameter::NAME).ok()?.as_child()?.clone(),
            None => parameter.as_created()?.child(Parameter::NAME)?.clone(),
        };
        match &name {
            Node::Original(original) => self
                .rewrite
                .get(original, SimpleName::IDENTIFIER)
                .ok()?
                .as_simple()
                .map(str::to_string),
            Node::Created(created) => created.simple(SimpleName::IDENTIFIER).map(str::to_string),
        }
    }

    fn thrown_type(&self, method: &MethodDecl, exception: &str) -> Result<Option<Node>> {
        Ok(self
            .current_list(method.syntax(), MethodDecl::THROWN_EXCEPTION_TYPES)?
            .into_iter()
            .find(|node| type_text(node).as_deref() == Some(exception)))
    }
}

/// Source text of an original type, or the name a created type spells out
fn type_text(node: &Node) -> Option<String> {
    match node {
        Node::Original(original) => Some(original.text().to_string()),
        Node::Created(created) => match created.kind() {
            JavaSyntaxKind::PrimitiveType => created
                .simple(PrimitiveType::PRIMITIVE_TYPE_CODE)
                .map(str::to_string),
            JavaSyntaxKind::SimpleName => created.simple(SimpleName::IDENTIFIER).map(str::to_string),
            JavaSyntaxKind::SimpleType => created.child(SimpleType::NAME).and_then(type_text),
            JavaSyntaxKind::QualifiedName => {
                let qualifier = created.child(QualifiedName::QUALIFIER).and_then(type_text)?;
                let name = created.child(QualifiedName::NAME).and_then(type_text)?;
                Some(format!("{qualifier}.{name}"))
            }
            _ => None,
        },
    }
}

/// Keyword of an original or created modifier
fn keyword_of(node: &Node) -> Option<String> {
    match node {
        Node::Original(original) => Modifier::cast(original.clone())?.keyword(),
        Node::Created(created) => created.simple(Modifier::KEYWORD).map(str::to_string),
    }
}

/// Whether a simple name refers to a variable rather than a member or type
fn is_variable_reference(name: &JavaSyntaxNode) -> bool {
    let Some(parent) = name.parent() else {
        return false;
    };
    match parent.kind() {
        // Member names follow a dot (or are the call name); only the receiver is a variable
        JavaSyntaxKind::MethodCall | JavaSyntaxKind::FieldAccess => {
            parent.first_child().as_ref() == Some(name)
                && parent.children().filter(|c| c.kind() == JavaSyntaxKind::SimpleName).count() > 1
        }
        JavaSyntaxKind::QualifiedName => parent.first_child().as_ref() == Some(name),
        JavaSyntaxKind::SimpleType | JavaSyntaxKind::Annotation => false,
        JavaSyntaxKind::MethodDecl | JavaSyntaxKind::TypeDecl => false,
        _ => true,
    }
}

/// Kind of the single statement in `code`
fn statement_kind(code: &str) -> std::result::Result<JavaSyntaxKind, String> {
    let wrapped = format!("class __Probe {{ void __probe() {{\n{code}\n}} }}");
    let (cst, errors) = parse_java(&wrapped);
    if let Some(error) = errors.first() {
        return Err(format!("'{code}' is not a valid statement: {}", error.message));
    }
    let body = cst
        .descendants()
        .filter_map(MethodDecl::cast)
        .find_map(|m| m.body())
        .ok_or_else(|| format!("'{code}' is not a valid statement"))?;
    let statements: Vec<_> = body.statements().collect();
    match statements.as_slice() {
        [statement] if statement.kind().conforms_to(NodeClass::Statement) => Ok(statement.kind()),
        _ => Err(format!("'{code}' must contain exactly one statement")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::DefaultFormatter;

    fn run(source: &str, script: &str) -> ScriptOutcome {
        let script = EditScript::from_json(script).unwrap();
        apply_script(source, &script, &DefaultFormatter::default()).unwrap()
    }

    const SERVICE: &str = "\
class Service {
    public void run(int count) {
        // start
        process(count);
    }

    void process(int count) {
        this.process(count - 1);
    }
}
";

    #[test]
    fn test_parse_script() {
        let script = EditScript::from_json(
            r#"{
                // comments are fine
                "operations": [
                    { "op": "removeMethod", "typeName": "A", "method": "f" },
                ],
            }"#,
        )
        .unwrap();
        assert_eq!(
            script.operations,
            vec![Operation::RemoveMethod {
                type_name: "A".into(),
                method: "f".into()
            }]
        );
        assert!(EditScript::from_json(r#"{"operations": [{"op": "explode"}]}"#).is_err());
    }

    #[test]
    fn test_rename_method_and_calls() {
        let outcome = run(
            SERVICE,
            r#"{"operations": [{"op": "renameMethod", "typeName": "Service", "method": "process", "newName": "handle"}]}"#,
        );
        assert_eq!(outcome.applied, 1);
        assert!(outcome.text.contains("        handle(count);"));
        assert!(outcome.text.contains("void handle(int count)"));
        assert!(outcome.text.contains("this.handle(count - 1);"));
        assert!(outcome.text.contains("// start"));
    }

    #[test]
    fn test_statement_and_parameter_operations() {
        let outcome = run(
            SERVICE,
            r#"{"operations": [
                {"op": "insertStatement", "typeName": "Service", "method": "run", "code": "log(count);", "index": 0},
                {"op": "addParameter", "typeName": "Service", "method": "run", "paramType": "String", "name": "label"}
            ]}"#,
        );
        assert_eq!(outcome.applied, 2);
        assert!(outcome.text.contains("public void run(int count, String label) {\n        log(count);\n        // start\n"));
    }

    #[test]
    fn test_modifiers_follow_canonical_order() {
        let outcome = run(
            "class A {\n    public void f() {}\n}\n",
            r#"{"operations": [
                {"op": "addModifier", "typeName": "A", "method": "f", "keyword": "static"},
                {"op": "addModifier", "typeName": "A", "method": "f", "keyword": "public"},
                {"op": "addModifier", "typeName": "A", "keyword": "final"}
            ]}"#,
        );
        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.text, "final class A {\n    public static void f() {}\n}\n");
    }

    #[test]
    fn test_rename_local_skips_members() {
        let outcome = run(
            "class A {\n    int f(int size) {\n        return size + this.size + size.size();\n    }\n}\n",
            r#"{"operations": [{"op": "renameLocal", "typeName": "A", "method": "f", "from": "size", "to": "n"}]}"#,
        );
        assert_eq!(
            outcome.text,
            "class A {\n    int f(int n) {\n        return n + this.size + n.size();\n    }\n}\n"
        );
    }

    #[test]
    fn test_reorder_and_throws() {
        let outcome = run(
            "class A {\n    void f(int a, int b) throws IOException {}\n}\n",
            r#"{"operations": [
                {"op": "reorderParameters", "typeName": "A", "method": "f", "order": ["b", "a"]},
                {"op": "removeThrows", "typeName": "A", "method": "f", "exception": "IOException"},
                {"op": "setReturnType", "typeName": "A", "method": "f", "returnType": "int"}
            ]}"#,
        );
        assert_eq!(outcome.text, "class A {\n    int f(int b, int a) {}\n}\n");
    }

    const RUN: &str = "class A {\n    void run(int a, int b) {}\n}\n";

    #[test]
    fn test_reorder_sees_added_parameter() {
        let outcome = run(
            RUN,
            r#"{"operations": [
                {"op": "addParameter", "typeName": "A", "method": "run", "paramType": "int", "name": "c"},
                {"op": "reorderParameters", "typeName": "A", "method": "run", "order": ["c", "b", "a"]}
            ]}"#,
        );
        assert_eq!(outcome.applied, 2);
        assert_eq!(outcome.text, "class A {\n    void run(int c, int b, int a) {}\n}\n");
    }

    #[test]
    fn test_reorder_rejects_removed_parameter() {
        let script = EditScript::from_json(
            r#"{"operations": [
                {"op": "removeParameter", "typeName": "A", "method": "run", "name": "a"},
                {"op": "reorderParameters", "typeName": "A", "method": "run", "order": ["b", "a"]}
            ]}"#,
        )
        .unwrap();
        let err = apply_script(RUN, &script, &DefaultFormatter::default()).unwrap_err();
        assert!(err.to_string().contains("expected 1 parameter names, got 2"), "{err}");
    }

    #[test]
    fn test_repeated_operations_apply_once() {
        let outcome = run(
            RUN,
            r#"{"operations": [
                {"op": "addModifier", "typeName": "A", "method": "run", "keyword": "public"},
                {"op": "addModifier", "typeName": "A", "method": "run", "keyword": "public"},
                {"op": "addThrows", "typeName": "A", "method": "run", "exception": "IOException"},
                {"op": "addThrows", "typeName": "A", "method": "run", "exception": "IOException"},
                {"op": "setReturnType", "typeName": "A", "method": "run", "returnType": "long"},
                {"op": "setReturnType", "typeName": "A", "method": "run", "returnType": "long"}
            ]}"#,
        );
        assert_eq!(outcome.applied, 3);
        assert_eq!(
            outcome.text,
            "class A {\n    public long run(int a, int b) throws IOException {}\n}\n"
        );

        let script = EditScript::from_json(
            r#"{"operations": [
                {"op": "addParameter", "typeName": "A", "method": "run", "paramType": "int", "name": "c"},
                {"op": "addParameter", "typeName": "A", "method": "run", "paramType": "int", "name": "c"}
            ]}"#,
        )
        .unwrap();
        let err = apply_script(RUN, &script, &DefaultFormatter::default()).unwrap_err();
        assert!(err.to_string().contains("parameter 'c' already exists"));
    }

    #[test]
    fn test_remove_what_earlier_operations_added() {
        let outcome = run(
            RUN,
            r#"{"operations": [
                {"op": "addModifier", "typeName": "A", "method": "run", "keyword": "static"},
                {"op": "removeModifier", "typeName": "A", "method": "run", "keyword": "static"},
                {"op": "insertStatement", "typeName": "A", "method": "run", "code": "go();"},
                {"op": "removeStatement", "typeName": "A", "method": "run", "index": 0}
            ]}"#,
        );
        assert_eq!(outcome.applied, 4);
        assert_eq!(outcome.text, RUN);
        assert!(!outcome.has_changes());
    }

    #[test]
    fn test_renames_to_same_name_are_not_counted() {
        let outcome = run(
            RUN,
            r#"{"operations": [
                {"op": "renameMethod", "typeName": "A", "method": "run", "newName": "run"},
                {"op": "renameLocal", "typeName": "A", "method": "run", "from": "a", "to": "a"}
            ]}"#,
        );
        assert_eq!(outcome.applied, 0);
        assert_eq!(outcome.text, RUN);
    }

    #[test]
    fn test_script_errors() {
        let script = EditScript::from_json(
            r#"{"operations": [{"op": "removeMethod", "typeName": "Missing", "method": "f"}]}"#,
        )
        .unwrap();
        let err = apply_script("class A {}", &script, &DefaultFormatter::default()).unwrap_err();
        assert!(matches!(err, RewriteError::ScriptError { .. }));
        assert!(err.to_string().contains("type 'Missing' not found"));

        let script = EditScript::from_json(
            r#"{"operations": [{"op": "insertStatement", "typeName": "A", "method": "f", "code": "a(); b();"}]}"#,
        )
        .unwrap();
        let err = apply_script("class A { void f() {} }", &script, &DefaultFormatter::default()).unwrap_err();
        assert!(err.to_string().contains("exactly one statement"));
    }

    #[test]
    fn test_targeting_keeps_declared_types() {
        let script = EditScript::from_json(
            r#"{"operations": [
                {"op": "removeMethod", "typeName": "Missing", "method": "f"},
                {"op": "renameMethod", "typeName": "A", "method": "f", "newName": "g"},
            ]}"#,
        )
        .unwrap();
        let narrowed = script.targeting("class A { void f() {} }");
        assert_eq!(narrowed.operations.len(), 1);
        assert_eq!(narrowed.operations[0].name(), "renameMethod");
        assert!(script.targeting("class B {}").operations.is_empty());
    }
}
