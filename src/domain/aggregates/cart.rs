//! Cart Aggregate

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::aggregates::catalog::Product;
use crate::domain::events::{CartEvent, StoreEvent};
use crate::domain::value_objects::{Money, Quantity, DEFAULT_CURRENCY};
use crate::Id;

/// Cart line as the remote API returns it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub id: Id,
    pub product: Product,
    pub quantity: u32,
}

impl CartLine {
    pub fn line_total(&self) -> Money { self.product.price().multiply(self.quantity) }
}

#[derive(Clone, Debug, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
    events: Vec<StoreEvent>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub id: Id,
    pub product_id: Id,
    pub model_id: Id,
    pub name: String,
    pub color: String,
    pub size: String,
    pub unit_price: String,
    pub quantity: u32,
    pub stock: u32,
    pub line_total: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: u32,
    pub subtotal: String,
}

impl Cart {
    pub fn from_lines(lines: Vec<CartLine>) -> Self { Self { lines, events: vec![] } }

    pub fn lines(&self) -> &[CartLine] { &self.lines }
    pub fn line(&self, line_id: Id) -> Option<&CartLine> { self.lines.iter().find(|l| l.id == line_id) }
    pub fn line_count(&self) -> usize { self.lines.len() }
    pub fn item_count(&self) -> u32 { self.lines.iter().map(|l| l.quantity).sum() }
    pub fn is_empty(&self) -> bool { self.lines.is_empty() }

    pub fn subtotal(&self) -> Money {
        self.lines.iter().fold(Money::zero(DEFAULT_CURRENCY), |acc, l| acc.add(&l.line_total()).unwrap_or(acc))
    }

    /// Quantity the line would hold after asking for `quantity`; zero means removal.
    pub fn clamped_quantity(&self, line_id: Id, quantity: u32) -> Result<u32, CartError> {
        let line = self.line(line_id).ok_or(CartError::LineNotFound(line_id))?;
        Ok(if quantity == 0 { 0 } else { Quantity::new(quantity).clamp_to(line.product.quantity).value() })
    }

    /// Mirrors a successful add. The returned line carries the server's merged
    /// quantity, so it replaces any line for the same product.
    pub fn apply_added(&mut self, line: CartLine) {
        self.events.push(StoreEvent::Cart(CartEvent::LineAdded { product_id: line.product.id, quantity: line.quantity }));
        match self.lines.iter_mut().find(|l| l.id == line.id || l.product.id == line.product.id) {
            Some(existing) => *existing = line,
            None => self.lines.push(line),
        }
    }

    pub fn apply_quantity(&mut self, line_id: Id, quantity: u32) -> Result<u32, CartError> {
        let quantity = self.clamped_quantity(line_id, quantity)?;
        if quantity == 0 {
            self.apply_removed(line_id)?;
        } else if let Some(line) = self.lines.iter_mut().find(|l| l.id == line_id) {
            line.quantity = quantity;
            self.events.push(StoreEvent::Cart(CartEvent::LineUpdated { line_id, quantity }));
        }
        Ok(quantity)
    }

    pub fn apply_removed(&mut self, line_id: Id) -> Result<(), CartError> {
        let before = self.lines.len();
        self.lines.retain(|l| l.id != line_id);
        if self.lines.len() == before { return Err(CartError::LineNotFound(line_id)); }
        self.events.push(StoreEvent::Cart(CartEvent::LineRemoved { line_id }));
        Ok(())
    }

    pub fn take_events(&mut self) -> Vec<StoreEvent> { std::mem::take(&mut self.events) }

    pub fn view(&self) -> CartView {
        CartView {
            lines: self.lines.iter().map(|l| CartLineView {
                id: l.id,
                product_id: l.product.id,
                model_id: l.product.model_id,
                name: l.product.model_name.clone().unwrap_or_default(),
                color: l.product.color.name.clone(),
                size: l.product.size.name.clone(),
                unit_price: l.product.price().format(),
                quantity: l.quantity,
                stock: l.product.quantity,
                line_total: l.line_total().format(),
            }).collect(),
            item_count: self.item_count(),
            subtotal: self.subtotal().format(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Cart line {0} not found")]
    LineNotFound(Id),
}
