//! Syntax kinds for the Java CST
//!
//! One enum covers trivia, tokens and node kinds. The discriminants are
//! sequential so they can be stored as raw rowan kinds.

use std::fmt;

/// Syntax kind for every token and node of the Java CST
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum JavaSyntaxKind {
    // Trivia
    Whitespace = 0,
    Newline,
    CommentLine,
    CommentBlock,

    // Identifiers and literals
    Ident,
    NumberLit,
    StringLit,
    CharLit,

    // Keywords
    PackageKw,
    ImportKw,
    ClassKw,
    InterfaceKw,
    ExtendsKw,
    ImplementsKw,
    PublicKw,
    ProtectedKw,
    PrivateKw,
    StaticKw,
    FinalKw,
    AbstractKw,
    NativeKw,
    SynchronizedKw,
    TransientKw,
    VolatileKw,
    StrictfpKw,
    DefaultKw,
    BooleanKw,
    ByteKw,
    CharKw,
    ShortKw,
    IntKw,
    LongKw,
    FloatKw,
    DoubleKw,
    VoidKw,
    IfKw,
    ElseKw,
    WhileKw,
    DoKw,
    ForKw,
    ReturnKw,
    ThrowKw,
    ThrowsKw,
    NewKw,
    ThisKw,
    SuperKw,
    NullKw,
    TrueKw,
    FalseKw,
    TryKw,
    CatchKw,
    FinallyKw,
    BreakKw,
    ContinueKw,
    InstanceofKw,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Ellipsis,
    At,
    Question,
    Colon,

    // Operators
    Eq,
    PlusEq,
    MinusEq,
    StarEq,
    SlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    EqEq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    AmpAmp,
    PipePipe,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Bang,
    Tilde,
    PlusPlus,
    MinusMinus,

    // Special
    Error,
    Eof,

    // Declarations
    CompilationUnit,
    PackageDecl,
    ImportDecl,
    TypeDecl,
    ModifierList,
    Modifier,
    Annotation,
    ExtendsClause,
    ImplementsClause,
    ClassBody,
    FieldDecl,
    MethodDecl,
    ParamList,
    Parameter,
    ThrowsClause,
    VarDeclarator,

    // Statements
    Block,
    LocalVarDecl,
    VarDeclExpr,
    ExprStmt,
    ReturnStmt,
    ThrowStmt,
    IfStmt,
    WhileStmt,
    DoStmt,
    ForStmt,
    ForInit,
    ForUpdate,
    BreakStmt,
    ContinueStmt,
    EmptyStmt,
    TryStmt,
    CatchClause,

    // Names and types
    SimpleName,
    QualifiedName,
    PrimitiveType,
    SimpleType,
    ArrayType,
    ParameterizedType,
    TypeArgList,

    // Expressions
    Assignment,
    ConditionalExpr,
    InfixExpr,
    InstanceofExpr,
    PrefixExpr,
    PostfixExpr,
    ParenExpr,
    MethodCall,
    ArgList,
    FieldAccess,
    NewExpr,
    ArrayAccess,
    CastExpr,
    NumberLiteral,
    StringLiteral,
    CharacterLiteral,
    BooleanLiteral,
    NullLiteral,
    ThisExpr,
    SuperExpr,

    // Recovery
    ErrorNode,
}

/// Structural class of a node, used to validate what a property accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeClass {
    Expression,
    Statement,
    Type,
    Name,
    SimpleName,
    BodyDeclaration,
    TypeDeclaration,
    ImportDeclaration,
    PackageDeclaration,
    Modifier,
    Parameter,
    VariableDeclarator,
    Block,
    CatchClause,
}

impl NodeClass {
    pub fn name(self) -> &'static str {
        match self {
            NodeClass::Expression => "expression",
            NodeClass::Statement => "statement",
            NodeClass::Type => "type",
            NodeClass::Name => "name",
            NodeClass::SimpleName => "simple name",
            NodeClass::BodyDeclaration => "body declaration",
            NodeClass::TypeDeclaration => "type declaration",
            NodeClass::ImportDeclaration => "import declaration",
            NodeClass::PackageDeclaration => "package declaration",
            NodeClass::Modifier => "modifier",
            NodeClass::Parameter => "parameter",
            NodeClass::VariableDeclarator => "variable declarator",
            NodeClass::Block => "block",
            NodeClass::CatchClause => "catch clause",
        }
    }
}

const LAST: u16 = JavaSyntaxKind::ErrorNode as u16;

impl JavaSyntaxKind {
    /// Convert a raw rowan kind back into a syntax kind
    pub fn from_raw(raw: u16) -> Self {
        assert!(raw <= LAST, "invalid raw syntax kind {raw}");
        // SAFETY: the enum is `repr(u16)` with sequential discriminants from 0 to LAST
        unsafe { std::mem::transmute::<u16, JavaSyntaxKind>(raw) }
    }

    /// Whitespace, newlines and comments
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            JavaSyntaxKind::Whitespace
                | JavaSyntaxKind::Newline
                | JavaSyntaxKind::CommentLine
                | JavaSyntaxKind::CommentBlock
        )
    }

    pub fn is_comment(self) -> bool {
        matches!(self, JavaSyntaxKind::CommentLine | JavaSyntaxKind::CommentBlock)
    }

    /// Token kinds (everything before the first node kind)
    pub fn is_token(self) -> bool {
        self <= JavaSyntaxKind::Eof
    }

    pub fn is_node(self) -> bool {
        !self.is_token()
    }

    pub fn is_keyword(self) -> bool {
        self >= JavaSyntaxKind::PackageKw && self <= JavaSyntaxKind::InstanceofKw
    }

    pub fn is_modifier_keyword(self) -> bool {
        matches!(
            self,
            JavaSyntaxKind::PublicKw
                | JavaSyntaxKind::ProtectedKw
                | JavaSyntaxKind::PrivateKw
                | JavaSyntaxKind::StaticKw
                | JavaSyntaxKind::FinalKw
                | JavaSyntaxKind::AbstractKw
                | JavaSyntaxKind::NativeKw
                | JavaSyntaxKind::SynchronizedKw
                | JavaSyntaxKind::TransientKw
                | JavaSyntaxKind::VolatileKw
                | JavaSyntaxKind::StrictfpKw
                | JavaSyntaxKind::DefaultKw
        )
    }

    /// Primitive type keywords, `void` included
    pub fn is_primitive_keyword(self) -> bool {
        matches!(
            self,
            JavaSyntaxKind::BooleanKw
                | JavaSyntaxKind::ByteKw
                | JavaSyntaxKind::CharKw
                | JavaSyntaxKind::ShortKw
                | JavaSyntaxKind::IntKw
                | JavaSyntaxKind::LongKw
                | JavaSyntaxKind::FloatKw
                | JavaSyntaxKind::DoubleKw
                | JavaSyntaxKind::VoidKw
        )
    }

    pub fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            JavaSyntaxKind::Eq
                | JavaSyntaxKind::PlusEq
                | JavaSyntaxKind::MinusEq
                | JavaSyntaxKind::StarEq
                | JavaSyntaxKind::SlashEq
                | JavaSyntaxKind::PercentEq
                | JavaSyntaxKind::AmpEq
                | JavaSyntaxKind::PipeEq
                | JavaSyntaxKind::CaretEq
        )
    }

    /// Binding power of a binary operator, higher binds tighter
    pub fn infix_precedence(self) -> Option<u8> {
        let precedence = match self {
            JavaSyntaxKind::PipePipe => 1,
            JavaSyntaxKind::AmpAmp => 2,
            JavaSyntaxKind::Pipe => 3,
            JavaSyntaxKind::Caret => 4,
            JavaSyntaxKind::Amp => 5,
            JavaSyntaxKind::EqEq | JavaSyntaxKind::NotEq => 6,
            JavaSyntaxKind::Lt
            | JavaSyntaxKind::Gt
            | JavaSyntaxKind::LtEq
            | JavaSyntaxKind::GtEq
            | JavaSyntaxKind::InstanceofKw => 7,
            JavaSyntaxKind::Plus | JavaSyntaxKind::Minus => 8,
            JavaSyntaxKind::Star | JavaSyntaxKind::Slash | JavaSyntaxKind::Percent => 9,
            _ => return None,
        };
        Some(precedence)
    }

    pub fn is_prefix_operator(self) -> bool {
        matches!(
            self,
            JavaSyntaxKind::Plus
                | JavaSyntaxKind::Minus
                | JavaSyntaxKind::Bang
                | JavaSyntaxKind::Tilde
                | JavaSyntaxKind::PlusPlus
                | JavaSyntaxKind::MinusMinus
        )
    }

    pub fn is_postfix_operator(self) -> bool {
        matches!(self, JavaSyntaxKind::PlusPlus | JavaSyntaxKind::MinusMinus)
    }

    /// Source text of fixed tokens (keywords, punctuation, operators)
    pub fn text(self) -> Option<&'static str> {
        use JavaSyntaxKind::*;
        let text = match self {
            PackageKw => "package",
            ImportKw => "import",
            ClassKw => "class",
            InterfaceKw => "interface",
            ExtendsKw => "extends",
            ImplementsKw => "implements",
            PublicKw => "public",
            ProtectedKw => "protected",
            PrivateKw => "private",
            StaticKw => "static",
            FinalKw => "final",
            AbstractKw => "abstract",
            NativeKw => "native",
            SynchronizedKw => "synchronized",
            TransientKw => "transient",
            VolatileKw => "volatile",
            StrictfpKw => "strictfp",
            DefaultKw => "default",
            BooleanKw => "boolean",
            ByteKw => "byte",
            CharKw => "char",
            ShortKw => "short",
            IntKw => "int",
            LongKw => "long",
            FloatKw => "float",
            DoubleKw => "double",
            VoidKw => "void",
            IfKw => "if",
            ElseKw => "else",
            WhileKw => "while",
            DoKw => "do",
            ForKw => "for",
            ReturnKw => "return",
            ThrowKw => "throw",
            ThrowsKw => "throws",
            NewKw => "new",
            ThisKw => "this",
            SuperKw => "super",
            NullKw => "null",
            TrueKw => "true",
            FalseKw => "false",
            TryKw => "try",
            CatchKw => "catch",
            FinallyKw => "finally",
            BreakKw => "break",
            ContinueKw => "continue",
            InstanceofKw => "instanceof",
            LParen => "(",
            RParen => ")",
            LBrace => "{",
            RBrace => "}",
            LBracket => "[",
            RBracket => "]",
            Semicolon => ";",
            Comma => ",",
            Dot => ".",
            Ellipsis => "...",
            At => "@",
            Question => "?",
            Colon => ":",
            Eq => "=",
            PlusEq => "+=",
            MinusEq => "-=",
            StarEq => "*=",
            SlashEq => "/=",
            PercentEq => "%=",
            AmpEq => "&=",
            PipeEq => "|=",
            CaretEq => "^=",
            EqEq => "==",
            NotEq => "!=",
            Lt => "<",
            Gt => ">",
            LtEq => "<=",
            GtEq => ">=",
            AmpAmp => "&&",
            PipePipe => "||",
            Plus => "+",
            Minus => "-",
            Star => "*",
            Slash => "/",
            Percent => "%",
            Amp => "&",
            Pipe => "|",
            Caret => "^",
            Bang => "!",
            Tilde => "~",
            PlusPlus => "++",
            MinusMinus => "--",
            _ => return None,
        };
        Some(text)
    }

    /// Look up a keyword by its text
    pub fn from_keyword(text: &str) -> Option<Self> {
        use JavaSyntaxKind::*;
        let kind = match text {
            "package" => PackageKw,
            "import" => ImportKw,
            "class" => ClassKw,
            "interface" => InterfaceKw,
            "extends" => ExtendsKw,
            "implements" => ImplementsKw,
            "public" => PublicKw,
            "protected" => ProtectedKw,
            "private" => PrivateKw,
            "static" => StaticKw,
            "final" => FinalKw,
            "abstract" => AbstractKw,
            "native" => NativeKw,
            "synchronized" => SynchronizedKw,
            "transient" => TransientKw,
            "volatile" => VolatileKw,
            "strictfp" => StrictfpKw,
            "default" => DefaultKw,
            "boolean" => BooleanKw,
            "byte" => ByteKw,
            "char" => CharKw,
            "short" => ShortKw,
            "int" => IntKw,
            "long" => LongKw,
            "float" => FloatKw,
            "double" => DoubleKw,
            "void" => VoidKw,
            "if" => IfKw,
            "else" => ElseKw,
            "while" => WhileKw,
            "do" => DoKw,
            "for" => ForKw,
            "return" => ReturnKw,
            "throw" => ThrowKw,
            "throws" => ThrowsKw,
            "new" => NewKw,
            "this" => ThisKw,
            "super" => SuperKw,
            "null" => NullKw,
            "true" => TrueKw,
            "false" => FalseKw,
            "try" => TryKw,
            "catch" => CatchKw,
            "finally" => FinallyKw,
            "break" => BreakKw,
            "continue" => ContinueKw,
            "instanceof" => InstanceofKw,
            _ => return None,
        };
        Some(kind)
    }

    /// Look up an operator token by its text
    pub fn from_operator(text: &str) -> Option<Self> {
        use JavaSyntaxKind::*;
        let kind = match text {
            "=" => Eq,
            "+=" => PlusEq,
            "-=" => MinusEq,
            "*=" => StarEq,
            "/=" => SlashEq,
            "%=" => PercentEq,
            "&=" => AmpEq,
            "|=" => PipeEq,
            "^=" => CaretEq,
            "==" => EqEq,
            "!=" => NotEq,
            "<" => Lt,
            ">" => Gt,
            "<=" => LtEq,
            ">=" => GtEq,
            "&&" => AmpAmp,
            "||" => PipePipe,
            "+" => Plus,
            "-" => Minus,
            "*" => Star,
            "/" => Slash,
            "%" => Percent,
            "&" => Amp,
            "|" => Pipe,
            "^" => Caret,
            "!" => Bang,
            "~" => Tilde,
            "++" => PlusPlus,
            "--" => MinusMinus,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether a node of this kind may be used where `class` is expected
    pub fn conforms_to(self, class: NodeClass) -> bool {
        use JavaSyntaxKind::*;
        match class {
            NodeClass::Expression => matches!(
                self,
                SimpleName
                    | QualifiedName
                    | Assignment
                    | ConditionalExpr
                    | InfixExpr
                    | InstanceofExpr
                    | PrefixExpr
                    | PostfixExpr
                    | ParenExpr
                    | MethodCall
                    | FieldAccess
                    | NewExpr
                    | ArrayAccess
                    | CastExpr
                    | NumberLiteral
                    | StringLiteral
                    | CharacterLiteral
                    | BooleanLiteral
                    | NullLiteral
                    | ThisExpr
                    | SuperExpr
                    | VarDeclExpr
            ),
            NodeClass::Statement => matches!(
                self,
                Block
                    | LocalVarDecl
                    | ExprStmt
                    | ReturnStmt
                    | ThrowStmt
                    | IfStmt
                    | WhileStmt
                    | DoStmt
                    | ForStmt
                    | BreakStmt
                    | ContinueStmt
                    | EmptyStmt
                    | TryStmt
            ),
            NodeClass::Type => matches!(
                self,
                PrimitiveType | SimpleType | ArrayType | ParameterizedType
            ),
            NodeClass::Name => matches!(self, SimpleName | QualifiedName),
            NodeClass::SimpleName => self == SimpleName,
            NodeClass::BodyDeclaration => matches!(self, FieldDecl | MethodDecl | TypeDecl),
            NodeClass::TypeDeclaration => self == TypeDecl,
            NodeClass::ImportDeclaration => self == ImportDecl,
            NodeClass::PackageDeclaration => self == PackageDecl,
            NodeClass::Modifier => matches!(self, Modifier | Annotation),
            NodeClass::Parameter => self == Parameter,
            NodeClass::VariableDeclarator => self == VarDeclarator,
            NodeClass::Block => self == Block,
            NodeClass::CatchClause => self == CatchClause,
        }
    }

    /// Nodes that only group children of their parent (brace bodies, parameter
    /// lists, clauses) and carry no properties of their own
    pub fn is_container(self) -> bool {
        matches!(
            self,
            JavaSyntaxKind::ModifierList
                | JavaSyntaxKind::ExtendsClause
                | JavaSyntaxKind::ImplementsClause
                | JavaSyntaxKind::ClassBody
                | JavaSyntaxKind::ParamList
                | JavaSyntaxKind::ThrowsClause
                | JavaSyntaxKind::ForInit
                | JavaSyntaxKind::ForUpdate
                | JavaSyntaxKind::TypeArgList
                | JavaSyntaxKind::ArgList
        )
    }
}

impl From<JavaSyntaxKind> for rowan::SyntaxKind {
    fn from(kind: JavaSyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

impl fmt::Display for JavaSyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_round_trip() {
        for raw in 0..=LAST {
            let kind = JavaSyntaxKind::from_raw(raw);
            assert_eq!(kind as u16, raw);
        }
    }

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(JavaSyntaxKind::from_keyword("class"), Some(JavaSyntaxKind::ClassKw));
        assert_eq!(JavaSyntaxKind::from_keyword("Class"), None);
        for raw in 0..=LAST {
            let kind = JavaSyntaxKind::from_raw(raw);
            if kind.is_keyword() {
                let text = kind.text().unwrap();
                assert_eq!(JavaSyntaxKind::from_keyword(text), Some(kind));
            }
        }
    }

    #[test]
    fn test_classes() {
        assert!(JavaSyntaxKind::SimpleName.conforms_to(NodeClass::Expression));
        assert!(JavaSyntaxKind::Block.conforms_to(NodeClass::Statement));
        assert!(!JavaSyntaxKind::FieldDecl.conforms_to(NodeClass::Statement));
        assert!(JavaSyntaxKind::Annotation.conforms_to(NodeClass::Modifier));
    }

    #[test]
    fn test_token_node_split() {
        assert!(JavaSyntaxKind::Eof.is_token());
        assert!(JavaSyntaxKind::CompilationUnit.is_node());
        assert!(JavaSyntaxKind::CommentBlock.is_trivia());
    }
}
