//! SQLite keyword table.
//!
//! Keywords are matched case-insensitively. Most non-reserved keywords fall
//! back to plain identifiers wherever the grammar has no use for them.

macro_rules! keywords {
    ($($variant:ident => $text:literal),* $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $($variant),*
        }

        impl Keyword {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Keyword::$variant => $text),*
                }
            }

            /// Look up a keyword, ignoring ASCII case.
            pub fn lookup(word: &str) -> Option<Keyword> {
                if word.len() > 17 || !word.is_ascii() {
                    return None;
                }
                let upper = word.to_ascii_uppercase();
                match upper.as_str() {
                    $($text => Some(Keyword::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

keywords! {
    Abort => "ABORT",
    Action => "ACTION",
    Add => "ADD",
    After => "AFTER",
    All => "ALL",
    Alter => "ALTER",
    Always => "ALWAYS",
    Analyze => "ANALYZE",
    And => "AND",
    As => "AS",
    Asc => "ASC",
    Attach => "ATTACH",
    Autoincrement => "AUTOINCREMENT",
    Before => "BEFORE",
    Begin => "BEGIN",
    Between => "BETWEEN",
    By => "BY",
    Cascade => "CASCADE",
    Case => "CASE",
    Cast => "CAST",
    Check => "CHECK",
    Collate => "COLLATE",
    Column => "COLUMN",
    Commit => "COMMIT",
    Conflict => "CONFLICT",
    Constraint => "CONSTRAINT",
    Create => "CREATE",
    Cross => "CROSS",
    Current => "CURRENT",
    CurrentDate => "CURRENT_DATE",
    CurrentTime => "CURRENT_TIME",
    CurrentTimestamp => "CURRENT_TIMESTAMP",
    Database => "DATABASE",
    Default => "DEFAULT",
    Deferrable => "DEFERRABLE",
    Deferred => "DEFERRED",
    Delete => "DELETE",
    Desc => "DESC",
    Detach => "DETACH",
    Distinct => "DISTINCT",
    Do => "DO",
    Drop => "DROP",
    Each => "EACH",
    Else => "ELSE",
    End => "END",
    Escape => "ESCAPE",
    Except => "EXCEPT",
    Exclude => "EXCLUDE",
    Exclusive => "EXCLUSIVE",
    Exists => "EXISTS",
    Explain => "EXPLAIN",
    Fail => "FAIL",
    Filter => "FILTER",
    First => "FIRST",
    Following => "FOLLOWING",
    For => "FOR",
    Foreign => "FOREIGN",
    From => "FROM",
    Full => "FULL",
    Generated => "GENERATED",
    Glob => "GLOB",
    Group => "GROUP",
    Groups => "GROUPS",
    Having => "HAVING",
    If => "IF",
    Ignore => "IGNORE",
    Immediate => "IMMEDIATE",
    In => "IN",
    Index => "INDEX",
    Indexed => "INDEXED",
    Initially => "INITIALLY",
    Inner => "INNER",
    Insert => "INSERT",
    Instead => "INSTEAD",
    Intersect => "INTERSECT",
    Into => "INTO",
    Is => "IS",
    Isnull => "ISNULL",
    Join => "JOIN",
    Key => "KEY",
    Last => "LAST",
    Left => "LEFT",
    Like => "LIKE",
    Limit => "LIMIT",
    Match => "MATCH",
    Materialized => "MATERIALIZED",
    Natural => "NATURAL",
    No => "NO",
    Not => "NOT",
    Nothing => "NOTHING",
    Notnull => "NOTNULL",
    Null => "NULL",
    Nulls => "NULLS",
    Of => "OF",
    Offset => "OFFSET",
    On => "ON",
    Or => "OR",
    Order => "ORDER",
    Others => "OTHERS",
    Outer => "OUTER",
    Over => "OVER",
    Partition => "PARTITION",
    Plan => "PLAN",
    Pragma => "PRAGMA",
    Preceding => "PRECEDING",
    Primary => "PRIMARY",
    Query => "QUERY",
    Raise => "RAISE",
    Range => "RANGE",
    Recursive => "RECURSIVE",
    References => "REFERENCES",
    Regexp => "REGEXP",
    Reindex => "REINDEX",
    Release => "RELEASE",
    Rename => "RENAME",
    Replace => "REPLACE",
    Restrict => "RESTRICT",
    Returning => "RETURNING",
    Right => "RIGHT",
    Rollback => "ROLLBACK",
    Row => "ROW",
    Rows => "ROWS",
    Savepoint => "SAVEPOINT",
    Select => "SELECT",
    Set => "SET",
    Table => "TABLE",
    Temp => "TEMP",
    Temporary => "TEMPORARY",
    Then => "THEN",
    Ties => "TIES",
    To => "TO",
    Transaction => "TRANSACTION",
    Trigger => "TRIGGER",
    Unbounded => "UNBOUNDED",
    Union => "UNION",
    Unique => "UNIQUE",
    Update => "UPDATE",
    Using => "USING",
    Vacuum => "VACUUM",
    Values => "VALUES",
    View => "VIEW",
    Virtual => "VIRTUAL",
    When => "WHEN",
    Where => "WHERE",
    Window => "WINDOW",
    With => "WITH",
    Without => "WITHOUT",
}

impl Keyword {
    /// CROSS, FULL, INNER, LEFT, NATURAL, OUTER, RIGHT.
    pub fn is_join_kw(self) -> bool {
        matches!(
            self,
            Keyword::Cross
                | Keyword::Full
                | Keyword::Inner
                | Keyword::Left
                | Keyword::Natural
                | Keyword::Outer
                | Keyword::Right
        )
    }

    /// LIKE, GLOB, REGEXP.
    pub fn is_like_kw(self) -> bool {
        matches!(self, Keyword::Like | Keyword::Glob | Keyword::Regexp)
    }

    /// CURRENT_DATE, CURRENT_TIME, CURRENT_TIMESTAMP.
    pub fn is_ctime_kw(self) -> bool {
        matches!(
            self,
            Keyword::CurrentDate | Keyword::CurrentTime | Keyword::CurrentTimestamp
        )
    }

    /// Keywords that act as identifiers when the grammar has no other use
    /// for them at that point.
    pub fn falls_back_to_id(self) -> bool {
        use Keyword::*;
        matches!(
            self,
            Abort
                | Action
                | After
                | Analyze
                | Asc
                | Attach
                | Before
                | Begin
                | By
                | Cascade
                | Cast
                | Column
                | Conflict
                | Database
                | Deferred
                | Desc
                | Detach
                | Do
                | Each
                | End
                | Exclusive
                | Explain
                | Fail
                | For
                | Ignore
                | Immediate
                | Initially
                | Instead
                | Like
                | Glob
                | Regexp
                | Match
                | No
                | Plan
                | Query
                | Key
                | Of
                | Offset
                | Pragma
                | Raise
                | Recursive
                | Release
                | Replace
                | Restrict
                | Row
                | Rows
                | Rollback
                | Savepoint
                | Temp
                | Temporary
                | Trigger
                | Vacuum
                | View
                | Virtual
                | With
                | Without
                | Nulls
                | First
                | Last
                | Current
                | Following
                | Partition
                | Preceding
                | Range
                | Unbounded
                | Exclude
                | Groups
                | Others
                | Ties
                | Generated
                | Always
                | Materialized
                | Reindex
                | Rename
                | CurrentDate
                | CurrentTime
                | CurrentTimestamp
                | If
        )
    }

    /// Leading keywords of statements other than SELECT.
    pub fn starts_other_statement(self) -> bool {
        use Keyword::*;
        matches!(
            self,
            Alter
                | Analyze
                | Attach
                | Begin
                | Commit
                | Create
                | Delete
                | Detach
                | Drop
                | End
                | Insert
                | Pragma
                | Reindex
                | Release
                | Replace
                | Rollback
                | Savepoint
                | Update
                | Vacuum
        )
    }
}

/// Built-in scalar functions whose result depends only on their arguments.
/// A call to one of these with constant arguments is itself constant.
pub fn is_constant_function(name: &str) -> bool {
    const NAMES: &[&str] = &[
        "abs", "char", "coalesce", "concat", "concat_ws", "date", "datetime", "format", "glob",
        "hex", "ifnull", "iif", "instr", "julianday", "length", "like", "likelihood", "likely",
        "lower", "ltrim", "nullif", "octet_length", "printf", "quote", "replace", "round",
        "rtrim", "sign", "strftime", "substr", "substring", "time", "trim", "typeof", "unhex",
        "unicode", "unixepoch", "unlikely", "upper", "zeroblob",
    ];
    NAMES.iter().any(|n| n.eq_ignore_ascii_case(name))
}
