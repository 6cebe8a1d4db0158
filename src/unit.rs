//! Importable units and their global namespaces.
//!
//! A [`Registry`] is the single, explicitly created table of every unit a
//! program can import. Importing a unit for the first time runs its
//! initialiser, which fills in the unit's [`Namespace`]; every later import,
//! from anywhere, returns the same [`Unit`]. There is therefore exactly one
//! namespace per unit, shared by all importers.
//!
//! ```
//! use std::rc::Rc;
//! use numview::{Registry, UnitDescriptor, Value};
//!
//! let mut registry = Registry::new();
//! registry.register(UnitDescriptor::new("config", "units/config.rs"), |_, globals| {
//!     globals.set("answer", Value::Int(42));
//!     Ok(())
//! });
//! let first = registry.import("config").unwrap();
//! let second = registry.import("config").unwrap();
//! assert!(Rc::ptr_eq(&first, &second));
//! assert_eq!(*first.globals().get("answer").unwrap(), Value::Int(42));
//! ```

use std::cell::{RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::rc::{Rc};

use super::{Error, Result};

/// A value bound to a global name.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

// ----------------------------------------------------------------------------

/// What a unit says about itself: its name, where it was loaded from, and
/// the package that contains it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitDescriptor {
    pub name: String,
    pub origin: PathBuf,
    pub package: Option<String>,
}

impl UnitDescriptor {
    /// Describes a top-level unit, outside any package.
    pub fn new(name: impl Into<String>, origin: impl Into<PathBuf>) -> Self {
        Self {name: name.into(), origin: origin.into(), package: None}
    }

    pub fn in_package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }
}

// ----------------------------------------------------------------------------

/// The global names of one unit.
///
/// Bindings hold `Rc<Value>`s, so binding a name that was imported from
/// another unit shares the very same value, which can be checked with
/// [`Rc::ptr_eq()`].
#[derive(Debug)]
pub struct Namespace {
    unit: String,
    values: RefCell<BTreeMap<String, Rc<Value>>>,
    functions: RefCell<BTreeSet<String>>,
}

impl Namespace {
    fn new(unit: &str) -> Self {
        Self {
            unit: unit.to_string(),
            values: RefCell::default(),
            functions: RefCell::default(),
        }
    }

    /// The name of the unit that owns this namespace.
    pub fn unit(&self) -> &str { &self.unit }

    /// Looks up a global.
    pub fn get(&self, name: &str) -> Result<Rc<Value>> {
        self.values.borrow().get(name).cloned().ok_or_else(|| Error::NameNotFound {
            unit: self.unit.clone(),
            name: name.to_string(),
        })
    }

    /// Binds `name` to a new value, and returns it.
    pub fn set(&self, name: &str, value: Value) -> Rc<Value> {
        let value = Rc::new(value);
        self.bind(name, Rc::clone(&value));
        value
    }

    /// Binds `name` to an existing value.
    pub fn bind(&self, name: &str, value: Rc<Value>) {
        self.values.borrow_mut().insert(name.to_string(), value);
    }

    /// Binds `name` in `self` to the value of `name` in `unit`.
    pub fn import_from(&self, unit: &Unit, name: &str) -> Result<Rc<Value>> {
        let value = unit.globals().get(name)?;
        self.bind(name, Rc::clone(&value));
        Ok(value)
    }

    /// Declares a function of this unit.
    pub fn define_function(&self, name: &str) {
        self.functions.borrow_mut().insert(name.to_string());
    }

    /// The names of all global values, in order.
    pub fn names(&self) -> Vec<String> { self.values.borrow().keys().cloned().collect() }
}

// ----------------------------------------------------------------------------

/// A loaded unit.
#[derive(Debug)]
pub struct Unit {
    descriptor: UnitDescriptor,
    globals: Rc<Namespace>,
}

impl Unit {
    pub fn name(&self) -> &str { &self.descriptor.name }

    pub fn origin(&self) -> &Path { &self.descriptor.origin }

    pub fn package(&self) -> Option<&str> { self.descriptor.package.as_deref() }

    pub fn descriptor(&self) -> &UnitDescriptor { &self.descriptor }

    pub fn globals(&self) -> &Rc<Namespace> { &self.globals }

    /// Returns a handle to a function declared by this unit.
    pub fn function(&self, name: &str) -> Result<UnitFunction> {
        if !self.globals.functions.borrow().contains(name) {
            return Err(Error::NameNotFound {unit: self.name().to_string(), name: name.to_string()});
        }
        Ok(UnitFunction {name: name.to_string(), globals: Rc::clone(&self.globals)})
    }
}

/// A function of a unit, which keeps a handle to the unit's global
/// namespace wherever it is imported.
#[derive(Debug, Clone)]
pub struct UnitFunction {
    name: String,
    globals: Rc<Namespace>,
}

impl UnitFunction {
    pub fn name(&self) -> &str { &self.name }

    /// The namespace of the unit that defined this function.
    pub fn globals(&self) -> &Rc<Namespace> { &self.globals }
}

// ----------------------------------------------------------------------------

/// Fills in the globals of a unit. It may import other units.
type Init = Rc<dyn Fn(&mut Registry, &Namespace) -> Result<()>>;

/// The process-wide table of units.
#[derive(Default)]
pub struct Registry {
    available: HashMap<String, (UnitDescriptor, Init)>,
    loaded: HashMap<String, Rc<Unit>>,
    /// Units whose initialiser is running, innermost last.
    loading: Vec<String>,
}

impl Registry {
    pub fn new() -> Self { Self::default() }

    /// Makes a unit available for import. Registering a name twice replaces
    /// the earlier registration, but not an already loaded unit.
    pub fn register(
        &mut self,
        descriptor: UnitDescriptor,
        init: impl Fn(&mut Registry, &Namespace) -> Result<()> + 'static,
    ) {
        self.available.insert(descriptor.name.clone(), (descriptor, Rc::new(init)));
    }

    /// Returns the unit called `name`, initialising it if this is the first
    /// import.
    ///
    /// Fails with [`Error::UnitNotFound`] if no such unit is registered, and
    /// with [`Error::ImportCycle`] if the unit is still being initialised.
    pub fn import(&mut self, name: &str) -> Result<Rc<Unit>> {
        if let Some(unit) = self.loaded.get(name) { return Ok(Rc::clone(unit)); }
        if self.loading.iter().any(|n| n == name) {
            return Err(Error::ImportCycle(name.to_string()));
        }
        let (descriptor, init) = self.available.get(name)
            .map(|(d, i)| (d.clone(), Rc::clone(i)))
            .ok_or_else(|| Error::UnitNotFound(name.to_string()))?;
        log::debug!("initialising unit {:?} from {}", name, descriptor.origin.display());
        let globals = Rc::new(Namespace::new(name));
        self.loading.push(name.to_string());
        let result = init(self, &globals);
        self.loading.pop();
        result?;
        let unit = Rc::new(Unit {descriptor, globals});
        self.loaded.insert(name.to_string(), Rc::clone(&unit));
        Ok(unit)
    }

    pub fn is_loaded(&self, name: &str) -> bool { self.loaded.contains_key(name) }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell};

    use super::*;

    fn shared_registry() -> Registry {
        let mut r = Registry::new();
        r.register(UnitDescriptor::new("c", "units/c.rs"), |_, g| {
            g.set("g_var", Value::Int(10));
            Ok(())
        });
        for name in ["a", "b"] {
            r.register(UnitDescriptor::new(name, format!("units/{}.rs", name)), |r, g| {
                let c = r.import("c")?;
                g.import_from(&c, "g_var")?;
                g.define_function("print_global_var");
                Ok(())
            });
        }
        r
    }

    #[test]
    fn importers_share_one_namespace() {
        let mut r = shared_registry();
        let a = r.import("a").unwrap();
        let b = r.import("b").unwrap();
        let a_var = a.function("print_global_var").unwrap().globals().get("g_var").unwrap();
        let b_var = b.function("print_global_var").unwrap().globals().get("g_var").unwrap();
        assert_eq!(a_var, b_var);
        assert!(Rc::ptr_eq(&a_var, &b_var));
        let c = r.import("c").unwrap();
        assert!(Rc::ptr_eq(&c.globals().get("g_var").unwrap(), &a_var));
    }

    #[test]
    fn initialised_once() {
        let runs = Rc::new(Cell::new(0));
        let mut r = Registry::new();
        let counter = Rc::clone(&runs);
        r.register(UnitDescriptor::new("once", "once.rs"), move |_, _| {
            counter.set(counter.get() + 1);
            Ok(())
        });
        assert!(!r.is_loaded("once"));
        r.import("once").unwrap();
        r.import("once").unwrap();
        assert!(r.is_loaded("once"));
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn rebinding_is_local() {
        let mut r = shared_registry();
        let a = r.import("a").unwrap();
        let c = r.import("c").unwrap();
        a.globals().set("g_var", Value::Int(11));
        assert_eq!(*c.globals().get("g_var").unwrap(), Value::Int(10));
        c.globals().set("g_var", Value::Int(12));
        let b = r.import("b").unwrap();
        assert_eq!(*b.globals().get("g_var").unwrap(), Value::Int(12));
    }

    #[test]
    fn metadata() {
        let mut r = shared_registry();
        r.register(UnitDescriptor::new("pkg.inner", "pkg/inner.rs").in_package("pkg"), |_, _| Ok(()));
        let a = r.import("a").unwrap();
        assert_eq!(a.name(), "a");
        assert_eq!(a.origin(), Path::new("units/a.rs"));
        assert_eq!(a.package(), None);
        assert_eq!(r.import("pkg.inner").unwrap().package(), Some("pkg"));
        assert_eq!(a.globals().names(), ["g_var"]);
    }

    #[test]
    fn failures() {
        let mut r = shared_registry();
        assert_eq!(r.import("missing").unwrap_err(), Error::UnitNotFound("missing".to_string()));
        let a = r.import("a").unwrap();
        assert!(matches!(a.function("nope"), Err(Error::NameNotFound {..})));
        assert!(matches!(a.globals().get("nope"), Err(Error::NameNotFound {..})));

        r.register(UnitDescriptor::new("x", "x.rs"), |r, _| r.import("y").map(|_| ()));
        r.register(UnitDescriptor::new("y", "y.rs"), |r, _| r.import("x").map(|_| ()));
        assert_eq!(r.import("x").unwrap_err(), Error::ImportCycle("x".to_string()));
        assert!(!r.is_loaded("x"));
        assert!(!r.is_loaded("y"));
    }
}
