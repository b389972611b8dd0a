use std::fmt::Display;

/// A scalar produced by a literal or by evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i32),
    Double(f64),
    Boolean(bool),
    String(String),
    Character(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Integer,
    Double,
    Boolean,
    String,
    Character,
    /// Error sentinel; never the type of a well-formed value.
    NoType,
}

impl Value {
    pub fn ty(&self) -> Type {
        match self {
            Value::Integer(_) => Type::Integer,
            Value::Double(_) => Type::Double,
            Value::Boolean(_) => Type::Boolean,
            Value::String(_) => Type::String,
            Value::Character(_) => Type::Character,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(n) => write!(f, "{n}"),
            Value::Double(n) => {
                if n.is_finite() && *n == n.trunc() {
                    write!(f, "{n}.0")
                } else {
                    write!(f, "{n}")
                }
            }
            Value::Boolean(b) => write!(f, "{b}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Character(c) => write!(f, "{c}"),
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Integer => write!(f, "INTEGER"),
            Type::Double => write!(f, "DOUBLE"),
            Type::Boolean => write!(f, "BOOLEAN"),
            Type::String => write!(f, "STRING"),
            Type::Character => write!(f, "CHARACTER"),
            Type::NoType => write!(f, "NO_TYPE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_report_their_type() {
        assert_eq!(Value::Integer(3).ty(), Type::Integer);
        assert_eq!(Value::Double(0.5).ty(), Type::Double);
        assert_eq!(Value::Boolean(true).ty(), Type::Boolean);
        assert_eq!(Value::String("x".into()).ty(), Type::String);
        assert_eq!(Value::Character('x').ty(), Type::Character);
    }

    #[test]
    fn whole_doubles_keep_a_fraction() {
        assert_eq!(Value::Double(2.0).to_string(), "2.0");
        assert_eq!(Value::Double(1.5).to_string(), "1.5");
        assert_eq!(Value::Integer(-4).to_string(), "-4");
    }
}
