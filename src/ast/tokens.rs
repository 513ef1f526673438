use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    /// Integer, decimal or exponent number
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -3.14
    /// 1e3
    /// ```
    Number(Decimal),

    /// String literal enclosed in single quotes, `''` escapes a quote.
    /// Holds the unescaped text.
    ///
    /// # Examples
    /// ```text
    /// 'hello'
    /// 'O''Brien'
    /// ```
    String(String),

    /// Boolean values
    Boolean(bool),

    /// Null value
    Null,

    /// Date or date-time literal, kept verbatim
    ///
    /// # Examples
    /// ```text
    /// 2024-01-31
    /// 2024-01-31T12:00:00.000Z
    /// ```
    DateTime(String),

    // Identifiers
    /// Member path, segments separated by `/`
    ///
    /// # Examples
    /// ```text
    /// age
    /// __system/deletedAt
    /// $root/Submissions/__system/deletedAt
    /// ```
    Identifier(String),

    // Comparison
    /// `eq`
    Eq,
    /// `ne`
    Ne,
    /// `lt`
    Lt,
    /// `le`
    Le,
    /// `gt`
    Gt,
    /// `ge`
    Ge,

    // Logical
    /// `and`
    And,
    /// `or`
    Or,
    /// `not`
    Not,

    // Arithmetic
    /// `add`
    Add,
    /// `sub`
    Sub,
    /// `mul`
    Mul,
    /// `div`
    Div,
    /// `mod`
    Mod,
    /// Prefix `-` that is not part of a number literal
    Minus,

    // Delimiters
    /// Left parenthesis for grouping or function calls
    LParen,

    /// Right parenthesis
    RParen,

    /// Comma separating function arguments
    Comma,

    /// End of input
    Eof,
}
