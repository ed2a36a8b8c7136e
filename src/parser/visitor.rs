//! Visitor dispatch over syntax kinds.
//!
//! Every node kind has its own `visit_*` method. The default for each one
//! forwards to its category (`visit_expression`, `visit_statement`,
//! `visit_type`, or straight to `visit_composite_element` for declarations,
//! clauses, blocks, short variable declarations and type names); categories forward to `visit_composite_element`, which
//! forwards to `visit_element`. Overriding any level intercepts every kind
//! below it that is not overridden itself.
//!
//! The trait methods, [`dispatch`] and [`SyntaxKind::category`] are all
//! generated from the one table at the bottom of this file, so they cannot
//! disagree.

use rowan::WalkEvent;

use super::syntax_kind::{SyntaxElement, SyntaxKind, SyntaxNode};

/// The category a node kind forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    Expression,
    Statement,
    Type,
    /// Declarations, clauses and other structural nodes.
    Composite,
}

macro_rules! forward {
    ($self:ident, $node:ident, Expression) => {
        $self.visit_expression($node)
    };
    ($self:ident, $node:ident, Statement) => {
        $self.visit_statement($node)
    };
    ($self:ident, $node:ident, Type) => {
        $self.visit_type($node)
    };
    ($self:ident, $node:ident, Composite) => {
        $self.visit_composite_element($node)
    };
}

macro_rules! visitor_table {
    ($( $category:ident { $( $kind:ident => $method:ident ),+ $(,)? } )+) => {
        /// Kind-specific visitor with a default forwarding chain.
        pub trait Visitor {
            /// Tokens, `ERROR` nodes and everything that was not intercepted.
            fn visit_element(&mut self, _element: &SyntaxElement) {}

            fn visit_composite_element(&mut self, node: &SyntaxNode) {
                self.visit_element(&SyntaxElement::Node(node.clone()));
            }

            fn visit_expression(&mut self, node: &SyntaxNode) {
                self.visit_composite_element(node);
            }

            fn visit_statement(&mut self, node: &SyntaxNode) {
                self.visit_composite_element(node);
            }

            fn visit_type(&mut self, node: &SyntaxNode) {
                self.visit_composite_element(node);
            }

            $($(
                fn $method(&mut self, node: &SyntaxNode) {
                    forward!(self, node, $category);
                }
            )+)+
        }

        /// Call the most specific `visit_*` method for `element`.
        pub fn dispatch<V: Visitor + ?Sized>(visitor: &mut V, element: &SyntaxElement) {
            let node = match element {
                SyntaxElement::Node(node) => node,
                SyntaxElement::Token(_) => return visitor.visit_element(element),
            };
            match node.kind() {
                $($(
                    SyntaxKind::$kind => visitor.$method(node),
                )+)+
                _ => visitor.visit_element(element),
            }
        }

        impl SyntaxKind {
            /// The category handler this kind forwards to; `None` for tokens
            /// and `ERROR`.
            pub fn category(self) -> Option<NodeCategory> {
                match self {
                    $(
                        $(SyntaxKind::$kind)|+ => Some(NodeCategory::$category),
                    )+
                    _ => None,
                }
            }
        }
    };
}

/// Visit `root` and every element below it in preorder.
pub fn walk<V: Visitor + ?Sized>(visitor: &mut V, root: &SyntaxNode) {
    for event in root.preorder_with_tokens() {
        if let WalkEvent::Enter(element) = event {
            dispatch(visitor, &element);
        }
    }
}

visitor_table! {
    Composite {
        SOURCE_FILE => visit_source_file,
        PACKAGE_CLAUSE => visit_package_clause,
        IMPORT_DECL => visit_import_declaration,
        IMPORT_SPEC => visit_import_spec,
        IMPORT_STRING => visit_import_string,
        TYPE_DECL => visit_type_declaration,
        TYPE_SPEC => visit_type_spec,
        VAR_DECL => visit_var_declaration,
        VAR_SPEC => visit_var_spec,
        VAR_DEF => visit_var_definition,
        CONST_DECL => visit_const_declaration,
        CONST_SPEC => visit_const_spec,
        CONST_DEF => visit_const_definition,
        FUNCTION_DECL => visit_function_declaration,
        METHOD_DECL => visit_method_declaration,
        RECEIVER => visit_receiver,
        SIGNATURE => visit_signature,
        PARAMETERS => visit_parameters,
        PARAM_DECL => visit_parameter_declaration,
        PARAM_DEF => visit_param_definition,
        RESULT => visit_result,
        TYPE_PARAMETERS => visit_type_parameters,
        FIELD_DECL => visit_field_declaration,
        TYPE_NAME => visit_type_name,
        BLOCK => visit_block,
        SHORT_VAR_DECL => visit_short_var_declaration,
        FIELD_DEF => visit_field_definition,
        ANON_FIELD_DEF => visit_anonymous_field_definition,
        TAG => visit_tag,
        METHOD_SPEC => visit_method_spec,
        EMBEDDED_INTERFACE => visit_embedded_interface,
        FOR_CLAUSE => visit_for_clause,
        RANGE_CLAUSE => visit_range_clause,
        CASE_CLAUSE => visit_case_clause,
        COMM_CLAUSE => visit_comm_clause,
        LABEL_REF => visit_label_ref,
        LITERAL_VALUE => visit_literal_value,
        ELEMENT => visit_literal_element,
        KEY => visit_key,
        FIELD_NAME => visit_field_name,
        ARGUMENT_LIST => visit_argument_list,
    }
    Type {
        TYPE_REFERENCE => visit_type_reference,
        POINTER_TYPE => visit_pointer_type,
        ARRAY_TYPE => visit_array_type,
        MAP_TYPE => visit_map_type,
        CHAN_TYPE => visit_chan_type,
        FUNCTION_TYPE => visit_function_type,
        STRUCT_TYPE => visit_struct_type,
        INTERFACE_TYPE => visit_interface_type,
        PAREN_TYPE => visit_paren_type,
    }
    Statement {
        DECLARATION_STATEMENT => visit_declaration_statement,
        EXPR_STATEMENT => visit_expression_statement,
        ASSIGNMENT_STATEMENT => visit_assignment_statement,
        INC_DEC_STATEMENT => visit_inc_dec_statement,
        SEND_STATEMENT => visit_send_statement,
        RETURN_STATEMENT => visit_return_statement,
        IF_STATEMENT => visit_if_statement,
        FOR_STATEMENT => visit_for_statement,
        SWITCH_STATEMENT => visit_switch_statement,
        SELECT_STATEMENT => visit_select_statement,
        GO_STATEMENT => visit_go_statement,
        DEFER_STATEMENT => visit_defer_statement,
        BREAK_STATEMENT => visit_break_statement,
        CONTINUE_STATEMENT => visit_continue_statement,
        GOTO_STATEMENT => visit_goto_statement,
        FALLTHROUGH_STATEMENT => visit_fallthrough_statement,
        LABELED_STATEMENT => visit_labeled_statement,
    }
    Expression {
        REFERENCE_EXPR => visit_reference_expression,
        LITERAL => visit_literal,
        PAREN_EXPR => visit_paren_expression,
        FUNCTION_LIT => visit_function_literal,
        COMPOSITE_LIT => visit_composite_literal,
        CALL_EXPR => visit_call_expression,
        INDEX_EXPR => visit_index_expression,
        SLICE_EXPR => visit_slice_expression,
        TYPE_ASSERTION_EXPR => visit_type_assertion_expression,
        CONVERSION_EXPR => visit_conversion_expression,
        UNARY_EXPR => visit_unary_expression,
        OR_EXPR => visit_or_expression,
        AND_EXPR => visit_and_expression,
        CONDITIONAL_EXPR => visit_conditional_expression,
        ADD_EXPR => visit_add_expression,
        MUL_EXPR => visit_mul_expression,
    }
}
