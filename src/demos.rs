//! Short scripted walkthroughs of the library, as run by the `numview`
//! binary.
//!
//! Each demonstration writes plain text to `out`. They double as end-to-end
//! checks of the view/copy contract and of the unit [`Registry`].

use std::io::{Write};
use std::rc::{Rc};

use super::{concatenate, vstack, Element, NdArray, Registry, UnitDescriptor, Value};

/// Writes the owner of `a`'s buffer, or `None` if `a` is the owner.
fn base_text<T: Element>(a: &NdArray<T>) -> String {
    a.base().map_or_else(|| "None".to_string(), |b| b.to_string())
}

fn flag(b: bool) -> &'static str { if b { "True" } else { "False" } }

/// Formats `shape` as a tuple: `(9,)`, `(3, 3)`.
fn shape_text(shape: &[usize]) -> String {
    match shape {
        [n] => format!("({},)", n),
        _ => format!("({})", shape.iter().map(usize::to_string).collect::<Vec<_>>().join(", ")),
    }
}

fn ownership<T: Element>(out: &mut impl Write, a: &NdArray<T>) -> anyhow::Result<()> {
    writeln!(out, "{} {}", flag(a.owns_data()), base_text(a))?;
    Ok(())
}

fn separator(out: &mut impl Write, section: usize) -> anyhow::Result<()> {
    writeln!(out, "{}", format!("{}=", section).repeat(80))?;
    Ok(())
}

/// Indexes a 3×4 array with pairs of index arrays, an index array and a
/// scalar, and an index array on the second axis only.
pub fn slice(out: &mut impl Write) -> anyhow::Result<()> {
    let a = NdArray::arange(0, 12)?.reshape(&[3, 4])?;
    writeln!(out, "{}__Print_1__\n", a)?;

    let i = NdArray::from_shape_vec(vec![2, 2], vec![0, 1, 1, 2])?;
    let j = NdArray::from_shape_vec(vec![2, 2], vec![2, 1, 3, 3])?;
    writeln!(out, "{}__Print_2__\n", a.index_by_arrays(&i, &j)?)?;

    let s = concatenate(&[&i.reshape(&[1, 2, 2])?, &j.reshape(&[1, 2, 2])?], 0)?;
    writeln!(out, "{}__Print_3__\n", a.index_by_stacked_arrays(&s)?)?;

    writeln!(out, "{}__Print_4__\n", a.index_by_array_and_scalar(&i, 2)?)?;

    writeln!(out, "{}__Print_5__\n", a.index_on_free_axis(&j)?)?;
    Ok(())
}

/// Shows which operations return views and which return copies, by printing
/// `owns_data()` and `base()` of each result and writing through it.
pub fn view_or_copy(out: &mut impl Write) -> anyhow::Result<()> {
    // In-place shape change.
    let mut a = NdArray::arange(1, 10)?;
    writeln!(out, "{}", a)?;
    writeln!(out, "{}", shape_text(a.shape()))?;
    a.set_shape(&[9, -1])?;
    ownership(out, &a)?;
    writeln!(out, "{}", a)?;
    separator(out, 1)?;

    // Full slice.
    let a = NdArray::arange(1, 10)?;
    let mut b = a.view();
    ownership(out, &b)?;
    b.set(4, 10)?;
    writeln!(out, "{}", a)?;
    separator(out, 2)?;

    // ravel
    let a = NdArray::arange(1, 10)?.reshape(&[3, 3])?;
    let mut b = a.ravel();
    ownership(out, &b)?;
    b.set(4, 10)?;
    writeln!(out, "{}", a)?;
    writeln!(out, "{}", b)?;
    separator(out, 3)?;

    // reshape
    let mut a = NdArray::arange(1, 10)?;
    let mut b = a.reshape(&[3, 3])?;
    ownership(out, &b)?;
    a.set(4, 10)?;
    writeln!(out, "{}", b)?;
    b.set((1, 1), 11)?;
    writeln!(out, "{}", a)?;
    separator(out, 4)?;

    // Transpose.
    let a = NdArray::arange(1, 10)?;
    let mut at = a.t();
    ownership(out, &at)?;
    let atp = a.transpose();
    ownership(out, &atp)?;
    at.set(4, 10)?;
    writeln!(out, "{}", a)?;
    separator(out, 5)?;

    // flatten
    let a = NdArray::arange(1, 10)?;
    let mut b = a.flatten();
    ownership(out, &b)?;
    b.set(4, 10)?;
    writeln!(out, "{}", a)?;
    separator(out, 6)?;

    // vstack
    let mut a = NdArray::arange(1, 10)?.reshape(&[3, 3])?;
    let mut b = NdArray::arange(11, 20)?.reshape(&[3, 3])?;
    let c = vstack(&[&a, &b])?;
    ownership(out, &c)?;
    a.set((1, 1), 10)?;
    b.set((1, 1), 20)?;
    writeln!(out, "{}", a)?;
    writeln!(out, "{}", b)?;
    writeln!(out, "{}", c)?;
    separator(out, 7)?;

    writeln!(out, "Force a copy so that diminish the confusion caused by whether it's a view or not!")?;
    let at = a.t().duplicate(true);
    ownership(out, &at)?;
    separator(out, 8)?;
    Ok(())
}

/// Registers units `a`, `b` and `c`, where `a` and `b` both import `g_var`
/// from `c`, and shows that both see one shared global.
pub fn globals(out: &mut impl Write) -> anyhow::Result<()> {
    let mut registry = Registry::new();
    registry.register(UnitDescriptor::new("c", "units/c.rs"), |_, globals| {
        globals.set("g_var", Value::Int(10));
        Ok(())
    });
    for name in ["a", "b"] {
        registry.register(UnitDescriptor::new(name, format!("units/{}.rs", name)), |registry, globals| {
            let c = registry.import("c")?;
            globals.import_from(&c, "g_var")?;
            globals.define_function("print_global_var");
            Ok(())
        });
    }

    let a = registry.import("a")?;
    let b = registry.import("b")?;
    let a_print = a.function("print_global_var")?;
    let b_print = b.function("print_global_var")?;

    for f in [&a_print, &b_print] {
        let globals = f.globals();
        writeln!(out, "g_var in {}: {}", globals.unit(), globals.get("g_var")?)?;
    }

    writeln!(out, "\n======================\n")?;
    writeln!(out, "{}", a.name())?;
    writeln!(out, "{}", a.origin().display())?;
    writeln!(out, "{}", a.package().unwrap_or("None"))?;

    writeln!(out, "\n======================\n")?;
    let a_var = a_print.globals().get("g_var")?;
    let b_var = b_print.globals().get("g_var")?;
    writeln!(out, "{}", a_var)?;
    writeln!(out, "{}", b_var)?;
    writeln!(out, "same object: {}", flag(Rc::ptr_eq(&a_var, &b_var)))?;
    Ok(())
}
