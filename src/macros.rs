//! Labelling macros: the label is the expression text, taken at compile
//! time with `stringify!`. These never read source files, so they work in
//! any build and never fail.

/// Print `expr` labelled with its own text.
///
/// ```ignore
/// pvar!(gp, total);          // total:    42
/// pvar!(gp.quiet(), total);  // unless QUIET is set
/// ```
#[macro_export]
macro_rules! pvar {
    ($printer:expr, $value:expr) => {
        $printer.print_varx(stringify!($value), &$value)
    };
}

/// `pvar!` returning the text instead of printing it.
#[macro_export]
macro_rules! spvar {
    ($printer:expr, $value:expr) => {{
        let printer = &$printer;
        let settings = printer.settings();
        printer.sprint_varx(
            stringify!($value),
            &$value,
            false,
            settings.col1_indent,
            settings.col1_width,
        )
    }};
}

/// Print several expressions, each labelled with its own text.
#[macro_export]
macro_rules! pvars {
    ($printer:expr, $($value:expr),+ $(,)?) => {
        $printer.print_vars(&[
            $((stringify!($value), &$value as &dyn $crate::value::Dump)),+
        ])
    };
}

/// Parameter list for [`CallStack::enter`](crate::stack::CallStack::enter):
/// each name with its `Debug` representation.
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<(::std::string::String, ::std::string::String)>::new()
    };
    ($($param:ident),+ $(,)?) => {
        vec![$((stringify!($param).to_string(), format!("{:?}", $param))),+]
    };
}
