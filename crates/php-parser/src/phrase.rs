//! Phrase kinds: the closed vocabulary of interior CST nodes.
//!
//! One variant per grammar production the parser can emit, including the
//! `Error*` placeholder kinds used while a construct's final shape is still
//! ambiguous and the structured document-comment kinds.

use serde::ser::{Serialize, Serializer};
use std::fmt;

/// Kind tag of a [`crate::Phrase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PhraseKind {
    Unknown,
    AdditiveExpression,
    AnonymousClassDeclaration,
    AnonymousClassDeclarationHeader,
    AnonymousFunctionCreationExpression,
    AnonymousFunctionHeader,
    AnonymousFunctionUseClause,
    AnonymousFunctionUseVariable,
    ArrowFunctionCreationExpression,
    ArrowFunctionHeader,
    ArgumentExpressionList,
    ArrayCreationExpression,
    ArrayElement,
    ArrayInitialiserList,
    ArrayKey,
    ArrayValue,
    BitwiseExpression,
    BreakStatement,
    ByRefAssignmentExpression,
    CaseStatement,
    CaseStatementList,
    CastExpression,
    CatchClause,
    CatchClauseList,
    CatchNameList,
    ClassBaseClause,
    ClassConstantAccessExpression,
    ClassConstDeclaration,
    ClassConstElement,
    ClassConstElementList,
    ClassDeclaration,
    ClassDeclarationBody,
    ClassDeclarationHeader,
    ClassInterfaceClause,
    ClassMemberDeclarationList,
    ClassModifiers,
    ClassTypeDesignator,
    CloneExpression,
    ClosureUseList,
    CoalesceExpression,
    CompoundAssignmentExpression,
    CompoundStatement,
    TernaryExpression,
    ConstantAccessExpression,
    ConstDeclaration,
    ConstElement,
    ConstElementList,
    ContinueStatement,
    DeclareDirective,
    DeclareStatement,
    DefaultStatement,
    DoStatement,
    DoubleQuotedStringLiteral,
    EchoIntrinsic,
    ElseClause,
    ElseIfClause,
    ElseIfClauseList,
    EmptyIntrinsic,
    EncapsulatedExpression,
    EncapsulatedVariable,
    EncapsulatedVariableList,
    EqualityExpression,
    Error,
    ErrorClassMemberDeclaration,
    ErrorClassTypeDesignatorAtom,
    ErrorControlExpression,
    ErrorExpression,
    ErrorScopedAccessExpression,
    ErrorTraitAdaptation,
    ErrorVariable,
    ErrorVariableAtom,
    EvalIntrinsic,
    ExitIntrinsic,
    ExponentiationExpression,
    ExpressionList,
    ExpressionStatement,
    FinallyClause,
    ForControl,
    ForeachCollection,
    ForeachKey,
    ForeachStatement,
    ForeachValue,
    ForEndOfLoop,
    ForExpressionGroup,
    ForInitialiser,
    ForStatement,
    FullyQualifiedName,
    FunctionCallExpression,
    FunctionDeclaration,
    FunctionDeclarationBody,
    FunctionDeclarationHeader,
    FunctionStaticDeclaration,
    FunctionStaticInitialiser,
    GlobalDeclaration,
    GotoStatement,
    HaltCompilerStatement,
    HeredocStringLiteral,
    Identifier,
    IfStatement,
    IncludeExpression,
    IncludeOnceExpression,
    InlineText,
    InstanceOfExpression,
    InstanceofTypeDesignator,
    InterfaceBaseClause,
    InterfaceDeclaration,
    InterfaceDeclarationBody,
    InterfaceDeclarationHeader,
    InterfaceMemberDeclarationList,
    IssetIntrinsic,
    ListIntrinsic,
    LogicalExpression,
    MemberModifierList,
    MemberName,
    MethodCallExpression,
    MethodDeclaration,
    MethodDeclarationBody,
    MethodDeclarationHeader,
    MethodReference,
    MultiplicativeExpression,
    NamedLabelStatement,
    NamespaceAliasingClause,
    NamespaceDefinition,
    NamespaceName,
    NamespaceUseClause,
    NamespaceUseClauseList,
    NamespaceUseDeclaration,
    NamespaceUseGroupClause,
    NamespaceUseGroupClauseList,
    NullStatement,
    ObjectCreationExpression,
    ParameterDeclaration,
    ParameterDeclarationList,
    PostfixDecrementExpression,
    PostfixIncrementExpression,
    PrefixDecrementExpression,
    PrefixIncrementExpression,
    PrintIntrinsic,
    PropertyAccessExpression,
    PropertyDeclaration,
    PropertyElement,
    PropertyElementList,
    PropertyInitialiser,
    QualifiedName,
    QualifiedNameList,
    RelationalExpression,
    RelativeQualifiedName,
    RelativeScope,
    RequireExpression,
    RequireOnceExpression,
    ReturnStatement,
    ReturnType,
    ScopedCallExpression,
    ScopedMemberName,
    ScopedPropertyAccessExpression,
    ShellCommandExpression,
    ShiftExpression,
    SimpleAssignmentExpression,
    SimpleVariable,
    StatementList,
    StaticVariableDeclaration,
    StaticVariableDeclarationList,
    SubscriptExpression,
    SwitchStatement,
    ThrowStatement,
    TraitAdaptationList,
    TraitAlias,
    TraitDeclaration,
    TraitDeclarationBody,
    TraitDeclarationHeader,
    TraitMemberDeclarationList,
    TraitPrecedence,
    TraitUseClause,
    TraitUseSpecification,
    TryStatement,
    TypeDeclaration,
    UnaryOpExpression,
    UnsetIntrinsic,
    VariableList,
    VariableNameList,
    VariadicUnpacking,
    WhileStatement,
    YieldExpression,
    YieldFromExpression,
    DocumentComment,
    DocumentCommentDescription,
    DocumentCommentAuthor,
    DocumentCommentEmail,
    DocumentCommentTag,
    DocumentCommentAuthorTag,
    DocumentCommentDeprecatedTag,
    DocumentCommentGlobalTag,
    DocumentCommentMethodTag,
    DocumentCommentParamTag,
    DocumentCommentPropertyTag,
    DocumentCommentReturnTag,
    DocumentCommentThrowsTag,
    DocumentCommentVarTag,
    TypeUnion,
    ParameterValue,
}

impl PhraseKind {
    /// Stable diagnostic name, used by `Display` and the JSON form.
    pub fn name(self) -> &'static str {
        match self {
            PhraseKind::Unknown => "Unknown",
            PhraseKind::AdditiveExpression => "AdditiveExpression",
            PhraseKind::AnonymousClassDeclaration => "AnonymousClassDeclaration",
            PhraseKind::AnonymousClassDeclarationHeader => "AnonymousClassDeclarationHeader",
            PhraseKind::AnonymousFunctionCreationExpression => "AnonymousFunctionCreationExpression",
            PhraseKind::AnonymousFunctionHeader => "AnonymousFunctionHeader",
            PhraseKind::AnonymousFunctionUseClause => "AnonymousFunctionUseClause",
            PhraseKind::AnonymousFunctionUseVariable => "AnonymousFunctionUseVariable",
            PhraseKind::ArrowFunctionCreationExpression => "ArrowFunctionCreationExpression",
            PhraseKind::ArrowFunctionHeader => "ArrowFunctionHeader",
            PhraseKind::ArgumentExpressionList => "ArgumentExpressionList",
            PhraseKind::ArrayCreationExpression => "ArrayCreationExpression",
            PhraseKind::ArrayElement => "ArrayElement",
            PhraseKind::ArrayInitialiserList => "ArrayInitialiserList",
            PhraseKind::ArrayKey => "ArrayKey",
            PhraseKind::ArrayValue => "ArrayValue",
            PhraseKind::BitwiseExpression => "BitwiseExpression",
            PhraseKind::BreakStatement => "BreakStatement",
            PhraseKind::ByRefAssignmentExpression => "ByRefAssignmentExpression",
            PhraseKind::CaseStatement => "CaseStatement",
            PhraseKind::CaseStatementList => "CaseStatementList",
            PhraseKind::CastExpression => "CastExpression",
            PhraseKind::CatchClause => "CatchClause",
            PhraseKind::CatchClauseList => "CatchClauseList",
            PhraseKind::CatchNameList => "CatchNameList",
            PhraseKind::ClassBaseClause => "ClassBaseClause",
            PhraseKind::ClassConstantAccessExpression => "ClassConstantAccessExpression",
            PhraseKind::ClassConstDeclaration => "ClassConstDeclaration",
            PhraseKind::ClassConstElement => "ClassConstElement",
            PhraseKind::ClassConstElementList => "ClassConstElementList",
            PhraseKind::ClassDeclaration => "ClassDeclaration",
            PhraseKind::ClassDeclarationBody => "ClassDeclarationBody",
            PhraseKind::ClassDeclarationHeader => "ClassDeclarationHeader",
            PhraseKind::ClassInterfaceClause => "ClassInterfaceClause",
            PhraseKind::ClassMemberDeclarationList => "ClassMemberDeclarationList",
            PhraseKind::ClassModifiers => "ClassModifiers",
            PhraseKind::ClassTypeDesignator => "ClassTypeDesignator",
            PhraseKind::CloneExpression => "CloneExpression",
            PhraseKind::ClosureUseList => "ClosureUseList",
            PhraseKind::CoalesceExpression => "CoalesceExpression",
            PhraseKind::CompoundAssignmentExpression => "CompoundAssignmentExpression",
            PhraseKind::CompoundStatement => "CompoundStatement",
            PhraseKind::TernaryExpression => "TernaryExpression",
            PhraseKind::ConstantAccessExpression => "ConstantAccessExpression",
            PhraseKind::ConstDeclaration => "ConstDeclaration",
            PhraseKind::ConstElement => "ConstElement",
            PhraseKind::ConstElementList => "ConstElementList",
            PhraseKind::ContinueStatement => "ContinueStatement",
            PhraseKind::DeclareDirective => "DeclareDirective",
            PhraseKind::DeclareStatement => "DeclareStatement",
            PhraseKind::DefaultStatement => "DefaultStatement",
            PhraseKind::DoStatement => "DoStatement",
            PhraseKind::DoubleQuotedStringLiteral => "DoubleQuotedStringLiteral",
            PhraseKind::EchoIntrinsic => "EchoIntrinsic",
            PhraseKind::ElseClause => "ElseClause",
            PhraseKind::ElseIfClause => "ElseIfClause",
            PhraseKind::ElseIfClauseList => "ElseIfClauseList",
            PhraseKind::EmptyIntrinsic => "EmptyIntrinsic",
            PhraseKind::EncapsulatedExpression => "EncapsulatedExpression",
            PhraseKind::EncapsulatedVariable => "EncapsulatedVariable",
            PhraseKind::EncapsulatedVariableList => "EncapsulatedVariableList",
            PhraseKind::EqualityExpression => "EqualityExpression",
            PhraseKind::Error => "Error",
            PhraseKind::ErrorClassMemberDeclaration => "ErrorClassMemberDeclaration",
            PhraseKind::ErrorClassTypeDesignatorAtom => "ErrorClassTypeDesignatorAtom",
            PhraseKind::ErrorControlExpression => "ErrorControlExpression",
            PhraseKind::ErrorExpression => "ErrorExpression",
            PhraseKind::ErrorScopedAccessExpression => "ErrorScopedAccessExpression",
            PhraseKind::ErrorTraitAdaptation => "ErrorTraitAdaptation",
            PhraseKind::ErrorVariable => "ErrorVariable",
            PhraseKind::ErrorVariableAtom => "ErrorVariableAtom",
            PhraseKind::EvalIntrinsic => "EvalIntrinsic",
            PhraseKind::ExitIntrinsic => "ExitIntrinsic",
            PhraseKind::ExponentiationExpression => "ExponentiationExpression",
            PhraseKind::ExpressionList => "ExpressionList",
            PhraseKind::ExpressionStatement => "ExpressionStatement",
            PhraseKind::FinallyClause => "FinallyClause",
            PhraseKind::ForControl => "ForControl",
            PhraseKind::ForeachCollection => "ForeachCollection",
            PhraseKind::ForeachKey => "ForeachKey",
            PhraseKind::ForeachStatement => "ForeachStatement",
            PhraseKind::ForeachValue => "ForeachValue",
            PhraseKind::ForEndOfLoop => "ForEndOfLoop",
            PhraseKind::ForExpressionGroup => "ForExpressionGroup",
            PhraseKind::ForInitialiser => "ForInitialiser",
            PhraseKind::ForStatement => "ForStatement",
            PhraseKind::FullyQualifiedName => "FullyQualifiedName",
            PhraseKind::FunctionCallExpression => "FunctionCallExpression",
            PhraseKind::FunctionDeclaration => "FunctionDeclaration",
            PhraseKind::FunctionDeclarationBody => "FunctionDeclarationBody",
            PhraseKind::FunctionDeclarationHeader => "FunctionDeclarationHeader",
            PhraseKind::FunctionStaticDeclaration => "FunctionStaticDeclaration",
            PhraseKind::FunctionStaticInitialiser => "FunctionStaticInitialiser",
            PhraseKind::GlobalDeclaration => "GlobalDeclaration",
            PhraseKind::GotoStatement => "GotoStatement",
            PhraseKind::HaltCompilerStatement => "HaltCompilerStatement",
            PhraseKind::HeredocStringLiteral => "HeredocStringLiteral",
            PhraseKind::Identifier => "Identifier",
            PhraseKind::IfStatement => "IfStatement",
            PhraseKind::IncludeExpression => "IncludeExpression",
            PhraseKind::IncludeOnceExpression => "IncludeOnceExpression",
            PhraseKind::InlineText => "InlineText",
            PhraseKind::InstanceOfExpression => "InstanceOfExpression",
            PhraseKind::InstanceofTypeDesignator => "InstanceofTypeDesignator",
            PhraseKind::InterfaceBaseClause => "InterfaceBaseClause",
            PhraseKind::InterfaceDeclaration => "InterfaceDeclaration",
            PhraseKind::InterfaceDeclarationBody => "InterfaceDeclarationBody",
            PhraseKind::InterfaceDeclarationHeader => "InterfaceDeclarationHeader",
            PhraseKind::InterfaceMemberDeclarationList => "InterfaceMemberDeclarationList",
            PhraseKind::IssetIntrinsic => "IssetIntrinsic",
            PhraseKind::ListIntrinsic => "ListIntrinsic",
            PhraseKind::LogicalExpression => "LogicalExpression",
            PhraseKind::MemberModifierList => "MemberModifierList",
            PhraseKind::MemberName => "MemberName",
            PhraseKind::MethodCallExpression => "MethodCallExpression",
            PhraseKind::MethodDeclaration => "MethodDeclaration",
            PhraseKind::MethodDeclarationBody => "MethodDeclarationBody",
            PhraseKind::MethodDeclarationHeader => "MethodDeclarationHeader",
            PhraseKind::MethodReference => "MethodReference",
            PhraseKind::MultiplicativeExpression => "MultiplicativeExpression",
            PhraseKind::NamedLabelStatement => "NamedLabelStatement",
            PhraseKind::NamespaceAliasingClause => "NamespaceAliasingClause",
            PhraseKind::NamespaceDefinition => "NamespaceDefinition",
            PhraseKind::NamespaceName => "NamespaceName",
            PhraseKind::NamespaceUseClause => "NamespaceUseClause",
            PhraseKind::NamespaceUseClauseList => "NamespaceUseClauseList",
            PhraseKind::NamespaceUseDeclaration => "NamespaceUseDeclaration",
            PhraseKind::NamespaceUseGroupClause => "NamespaceUseGroupClause",
            PhraseKind::NamespaceUseGroupClauseList => "NamespaceUseGroupClauseList",
            PhraseKind::NullStatement => "NullStatement",
            PhraseKind::ObjectCreationExpression => "ObjectCreationExpression",
            PhraseKind::ParameterDeclaration => "ParameterDeclaration",
            PhraseKind::ParameterDeclarationList => "ParameterDeclarationList",
            PhraseKind::PostfixDecrementExpression => "PostfixDecrementExpression",
            PhraseKind::PostfixIncrementExpression => "PostfixIncrementExpression",
            PhraseKind::PrefixDecrementExpression => "PrefixDecrementExpression",
            PhraseKind::PrefixIncrementExpression => "PrefixIncrementExpression",
            PhraseKind::PrintIntrinsic => "PrintIntrinsic",
            PhraseKind::PropertyAccessExpression => "PropertyAccessExpression",
            PhraseKind::PropertyDeclaration => "PropertyDeclaration",
            PhraseKind::PropertyElement => "PropertyElement",
            PhraseKind::PropertyElementList => "PropertyElementList",
            PhraseKind::PropertyInitialiser => "PropertyInitialiser",
            PhraseKind::QualifiedName => "QualifiedName",
            PhraseKind::QualifiedNameList => "QualifiedNameList",
            PhraseKind::RelationalExpression => "RelationalExpression",
            PhraseKind::RelativeQualifiedName => "RelativeQualifiedName",
            PhraseKind::RelativeScope => "RelativeScope",
            PhraseKind::RequireExpression => "RequireExpression",
            PhraseKind::RequireOnceExpression => "RequireOnceExpression",
            PhraseKind::ReturnStatement => "ReturnStatement",
            PhraseKind::ReturnType => "ReturnType",
            PhraseKind::ScopedCallExpression => "ScopedCallExpression",
            PhraseKind::ScopedMemberName => "ScopedMemberName",
            PhraseKind::ScopedPropertyAccessExpression => "ScopedPropertyAccessExpression",
            PhraseKind::ShellCommandExpression => "ShellCommandExpression",
            PhraseKind::ShiftExpression => "ShiftExpression",
            PhraseKind::SimpleAssignmentExpression => "SimpleAssignmentExpression",
            PhraseKind::SimpleVariable => "SimpleVariable",
            PhraseKind::StatementList => "StatementList",
            PhraseKind::StaticVariableDeclaration => "StaticVariableDeclaration",
            PhraseKind::StaticVariableDeclarationList => "StaticVariableDeclarationList",
            PhraseKind::SubscriptExpression => "SubscriptExpression",
            PhraseKind::SwitchStatement => "SwitchStatement",
            PhraseKind::ThrowStatement => "ThrowStatement",
            PhraseKind::TraitAdaptationList => "TraitAdaptationList",
            PhraseKind::TraitAlias => "TraitAlias",
            PhraseKind::TraitDeclaration => "TraitDeclaration",
            PhraseKind::TraitDeclarationBody => "TraitDeclarationBody",
            PhraseKind::TraitDeclarationHeader => "TraitDeclarationHeader",
            PhraseKind::TraitMemberDeclarationList => "TraitMemberDeclarationList",
            PhraseKind::TraitPrecedence => "TraitPrecedence",
            PhraseKind::TraitUseClause => "TraitUseClause",
            PhraseKind::TraitUseSpecification => "TraitUseSpecification",
            PhraseKind::TryStatement => "TryStatement",
            PhraseKind::TypeDeclaration => "TypeDeclaration",
            PhraseKind::UnaryOpExpression => "UnaryOpExpression",
            PhraseKind::UnsetIntrinsic => "UnsetIntrinsic",
            PhraseKind::VariableList => "VariableList",
            PhraseKind::VariableNameList => "VariableNameList",
            PhraseKind::VariadicUnpacking => "VariadicUnpacking",
            PhraseKind::WhileStatement => "WhileStatement",
            PhraseKind::YieldExpression => "YieldExpression",
            PhraseKind::YieldFromExpression => "YieldFromExpression",
            PhraseKind::DocumentComment => "DocumentComment",
            PhraseKind::DocumentCommentDescription => "DocumentCommentDescription",
            PhraseKind::DocumentCommentAuthor => "DocumentCommentAuthor",
            PhraseKind::DocumentCommentEmail => "DocumentCommentEmail",
            PhraseKind::DocumentCommentTag => "DocumentCommentTag",
            PhraseKind::DocumentCommentAuthorTag => "DocumentCommentAuthorTag",
            PhraseKind::DocumentCommentDeprecatedTag => "DocumentCommentDeprecatedTag",
            PhraseKind::DocumentCommentGlobalTag => "DocumentCommentGlobalTag",
            PhraseKind::DocumentCommentMethodTag => "DocumentCommentMethodTag",
            PhraseKind::DocumentCommentParamTag => "DocumentCommentParamTag",
            PhraseKind::DocumentCommentPropertyTag => "DocumentCommentPropertyTag",
            PhraseKind::DocumentCommentReturnTag => "DocumentCommentReturnTag",
            PhraseKind::DocumentCommentThrowsTag => "DocumentCommentThrowsTag",
            PhraseKind::DocumentCommentVarTag => "DocumentCommentVarTag",
            PhraseKind::TypeUnion => "TypeUnion",
            PhraseKind::ParameterValue => "ParameterValue",
        }
    }
}

impl fmt::Display for PhraseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for PhraseKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
