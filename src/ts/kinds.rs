//! Catalogue of tree-sitter-python node kinds.
//!
//! Records which kinds are statements, which bind names on their `left`
//! side, and a short description for display. Kinds missing from the table
//! fall back to a suffix rule.

/// Properties of one node kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindTraits {
    pub kind: &'static str,
    pub description: &'static str,
    pub statement: bool,
    pub assignment: bool,
}

const fn statement(kind: &'static str, description: &'static str) -> KindTraits {
    KindTraits {
        kind,
        description,
        statement: true,
        assignment: false,
    }
}

const fn expression(kind: &'static str, description: &'static str) -> KindTraits {
    KindTraits {
        kind,
        description,
        statement: false,
        assignment: false,
    }
}

const fn binding(kind: &'static str, description: &'static str) -> KindTraits {
    KindTraits {
        kind,
        description,
        statement: false,
        assignment: true,
    }
}

const KINDS: &[KindTraits] = &[
    statement("module", "module"),
    statement("import_statement", "import"),
    statement("import_from_statement", "from-import"),
    statement("future_import_statement", "future import"),
    statement("function_definition", "function definition"),
    statement("class_definition", "class definition"),
    statement("decorated_definition", "decorated definition"),
    statement("expression_statement", "expression statement"),
    statement("return_statement", "return"),
    statement("if_statement", "if"),
    statement("for_statement", "for loop"),
    statement("while_statement", "while loop"),
    statement("try_statement", "try"),
    statement("with_statement", "with"),
    statement("match_statement", "match"),
    statement("raise_statement", "raise"),
    statement("assert_statement", "assert"),
    statement("pass_statement", "pass"),
    statement("break_statement", "break"),
    statement("continue_statement", "continue"),
    statement("delete_statement", "del"),
    statement("global_statement", "global"),
    statement("nonlocal_statement", "nonlocal"),
    statement("type_alias_statement", "type alias"),
    binding("assignment", "assignment"),
    binding("augmented_assignment", "augmented assignment"),
    expression("identifier", "name"),
    expression("attribute", "attribute access"),
    expression("call", "call"),
    expression("subscript", "subscript"),
    expression("argument_list", "arguments"),
    expression("keyword_argument", "keyword argument"),
    expression("parameters", "parameters"),
    expression("binary_operator", "binary operation"),
    expression("boolean_operator", "boolean operation"),
    expression("comparison_operator", "comparison"),
    expression("unary_operator", "unary operation"),
    expression("not_operator", "not"),
    expression("conditional_expression", "conditional expression"),
    expression("lambda", "lambda"),
    expression("await", "await"),
    expression("string", "string"),
    expression("integer", "integer"),
    expression("float", "float"),
    expression("true", "True"),
    expression("false", "False"),
    expression("none", "None"),
    expression("list", "list"),
    expression("tuple", "tuple"),
    expression("dictionary", "dict"),
    expression("set", "set"),
    expression("list_comprehension", "list comprehension"),
    expression("dictionary_comprehension", "dict comprehension"),
    expression("generator_expression", "generator"),
    expression("block", "block"),
    expression("comment", "comment"),
];

/// Look up the traits for `kind`.
///
/// Unknown kinds ending in `_statement` count as statements; everything
/// else is a plain expression with an empty description.
pub fn traits(kind: &str) -> KindTraits {
    KINDS
        .iter()
        .find(|entry| entry.kind == kind)
        .copied()
        .unwrap_or(KindTraits {
            kind: "",
            description: "",
            statement: kind.ends_with("_statement"),
            assignment: false,
        })
}

pub fn is_statement(kind: &str) -> bool {
    traits(kind).statement
}

pub fn is_assignment(kind: &str) -> bool {
    traits(kind).assignment
}

pub fn description(kind: &str) -> &'static str {
    traits(kind).description
}
