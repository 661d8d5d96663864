//! Grammars shared by the integration tests.

pub const EXPRESSION_GRAMMAR: &str = "E->E+T. E->T. T->T*F. T->F. F->(E). F->id.";

pub const DANGLING_ELSE_GRAMMAR: &str = "S -> if E then S. S -> if E then S else S. S -> other.";

pub const LL_EXPRESSION_GRAMMAR: &str = "E->TE'. E'->+TE'|&. T->FT'. T'->*FT'|&. F->(E)|id.";
