//! Resolved SQL expressions.
//!
//! Expressions reaching the renderer are already type-checked: each node
//! optionally carries the `BasicType` it was resolved to, which renderers use
//! for dialect type names and for converting bound values.

use std::sync::Arc;

use ormtype_core::Value;
use ormtype_types::BasicType;

/// A resolved SQL expression node.
#[derive(Debug, Clone)]
pub enum Expression {
    /// Column reference, optionally qualified by a table alias
    Column {
        qualifier: Option<String>,
        name: String,
        ty: Option<Arc<BasicType>>,
    },
    /// Inline literal
    Literal {
        value: Value,
        ty: Option<Arc<BasicType>>,
    },
    /// Bound parameter
    Parameter {
        value: Value,
        ty: Option<Arc<BasicType>>,
    },
    /// Function call
    Function {
        name: String,
        args: Vec<Expression>,
        return_type: Option<Arc<BasicType>>,
    },
}

impl Expression {
    /// Create an unqualified column reference.
    pub fn col(name: impl Into<String>) -> Self {
        Expression::Column {
            qualifier: None,
            name: name.into(),
            ty: None,
        }
    }

    /// Create a column reference qualified by a table alias.
    pub fn qualified(qualifier: impl Into<String>, name: impl Into<String>) -> Self {
        Expression::Column {
            qualifier: Some(qualifier.into()),
            name: name.into(),
            ty: None,
        }
    }

    /// Create an inline literal.
    pub fn lit(value: impl Into<Value>) -> Self {
        Expression::Literal {
            value: value.into(),
            ty: None,
        }
    }

    /// Create a bound parameter.
    pub fn param(value: impl Into<Value>) -> Self {
        Expression::Parameter {
            value: value.into(),
            ty: None,
        }
    }

    /// Create a function call.
    pub fn function(name: impl Into<String>, args: Vec<Expression>) -> Self {
        Expression::Function {
            name: name.into(),
            args,
            return_type: None,
        }
    }

    /// Attach the resolved type of this expression.
    pub fn typed(mut self, resolved: Arc<BasicType>) -> Self {
        match &mut self {
            Expression::Column { ty, .. }
            | Expression::Literal { ty, .. }
            | Expression::Parameter { ty, .. } => *ty = Some(resolved),
            Expression::Function { return_type, .. } => *return_type = Some(resolved),
        }
        self
    }

    /// The resolved type of this expression, if known.
    pub fn expression_type(&self) -> Option<&Arc<BasicType>> {
        match self {
            Expression::Column { ty, .. }
            | Expression::Literal { ty, .. }
            | Expression::Parameter { ty, .. } => ty.as_ref(),
            Expression::Function { return_type, .. } => return_type.as_ref(),
        }
    }
}
