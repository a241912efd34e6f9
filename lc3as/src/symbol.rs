use ahash::AHashMap;
use string_interner::{DefaultBackend, DefaultSymbol, StringInterner};

use crate::Address;


/// Labels and the addresses they were defined at, kept in definition order.
#[derive(Debug, Default)]
pub struct SymbolTable {
    si: StringInterner<DefaultBackend>,
    by_name: AHashMap<DefaultSymbol, Address>,
    by_addr: AHashMap<Address, DefaultSymbol>,
    order: Vec<DefaultSymbol>,
}

impl SymbolTable {
    /// Adds `name` at `addr`. Returns `false` and keeps the first address
    /// if the name is already defined.
    pub fn insert(&mut self, name: &str, addr: Address) -> bool {
        let symbol = self.si.get_or_intern(name);
        if self.by_name.contains_key(&symbol) {
            return false;
        }
        self.by_name.insert(symbol, addr);
        // the first label at an address names it
        self.by_addr.entry(addr).or_insert(symbol);
        self.order.push(symbol);
        true
    }

    pub fn find_by_name(&self, name: &str) -> Option<Address> {
        let symbol = self.si.get(name)?;
        self.by_name.get(&symbol).copied()
    }

    pub fn find_by_addr(&self, addr: Address) -> Option<&str> {
        let symbol = self.by_addr.get(&addr)?;
        self.si.resolve(*symbol)
    }

    /// Symbols in the order they were defined.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Address)> + '_ {
        self.order.iter().filter_map(|symbol| {
            let name = self.si.resolve(*symbol)?;
            Some((name, self.by_name[symbol]))
        })
    }

    pub fn for_each(&self, mut visit: impl FnMut(&str, Address)) {
        for (name, addr) in self.iter() {
            visit(name, addr);
        }
    }
}
