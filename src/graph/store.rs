//! In-memory procurement graph storage
//!
//! Arena storage for orders, items and edges with adjacency lists on both
//! sides. The graph is assembled by [`GraphBuilder`](super::builder::GraphBuilder)
//! and is read-only afterwards.

use super::edge::Edge;
use super::node::{Item, Order, SupplierInfo};
use super::types::{EdgeId, ItemId, OrderId, SupplierId};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Errors that can occur during graph operations
#[derive(Error, Debug, PartialEq)]
pub enum GraphError {
    #[error("Order {0} not found")]
    OrderNotFound(OrderId),

    #[error("Item {0} not found")]
    ItemNotFound(ItemId),

    #[error("Invalid amount {amount} for order {order}: amounts must be positive and finite")]
    InvalidAmount { order: String, amount: f64 },

    #[error("Record is missing an order number")]
    MissingOrderNumber,

    #[error("Record for order {0} is missing a normalized item key")]
    MissingItemKey(String),
}

pub type GraphResult<T> = Result<T, GraphError>;

/// Bipartite Order-Item graph
///
/// - orders: OrderId -> Order
/// - items: ItemId -> Item
/// - edges: EdgeId -> Edge (always Order -> Item)
/// - order_edges / item_edges: adjacency lists in insertion order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcurementGraph {
    orders: Vec<Order>,
    items: Vec<Item>,
    edges: Vec<Edge>,

    order_edges: Vec<Vec<EdgeId>>,
    item_edges: Vec<Vec<EdgeId>>,

    /// Order number -> OrderId
    order_index: FxHashMap<String, OrderId>,
    /// Normalized item key -> ItemId
    item_index: FxHashMap<String, ItemId>,
    /// (order, item) -> EdgeId, collapses parallel records into one edge
    edge_index: FxHashMap<(OrderId, ItemId), EdgeId>,
}

impl ProcurementGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or reuse the order with this number
    pub(crate) fn upsert_order(&mut self, number: &str, suppliers: Option<SupplierInfo>) -> OrderId {
        if let Some(&id) = self.order_index.get(number) {
            return id;
        }
        let id = OrderId::new(self.orders.len() as u64);
        self.orders.push(Order::new(id, number, suppliers));
        self.order_edges.push(Vec::new());
        self.order_index.insert(number.to_string(), id);
        id
    }

    /// Create or reuse the item with this key. The first description seen labels the item.
    pub(crate) fn upsert_item(&mut self, key: &str, description: &str) -> ItemId {
        if let Some(&id) = self.item_index.get(key) {
            return id;
        }
        let id = ItemId::new(self.items.len() as u64);
        self.items.push(Item::new(id, key, description));
        self.item_edges.push(Vec::new());
        self.item_index.insert(key.to_string(), id);
        id
    }

    /// Add `amount` onto the (order, item) edge, creating it on first use
    pub(crate) fn add_amount(
        &mut self,
        order: OrderId,
        item: ItemId,
        supplier: Option<&SupplierId>,
        amount: f64,
    ) -> GraphResult<EdgeId> {
        let number = self
            .orders
            .get(order.index())
            .map(|o| o.number.clone())
            .ok_or(GraphError::OrderNotFound(order))?;
        if item.index() >= self.items.len() {
            return Err(GraphError::ItemNotFound(item));
        }
        if !amount.is_finite() || amount <= 0.0 {
            return Err(GraphError::InvalidAmount { order: number, amount });
        }

        let id = match self.edge_index.get(&(order, item)) {
            Some(&id) => id,
            None => {
                let id = EdgeId::new(self.edges.len() as u64);
                self.edges.push(Edge::new(id, order, item));
                self.order_edges[order.index()].push(id);
                self.item_edges[item.index()].push(id);
                self.edge_index.insert((order, item), id);
                id
            }
        };
        self.edges[id.index()].accumulate(supplier, amount);
        Ok(id)
    }

    #[cfg(test)]
    pub(crate) fn order_mut(&mut self, id: OrderId) -> Option<&mut Order> {
        self.orders.get_mut(id.index())
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty() && self.items.is_empty()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(id.index())
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.index())
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.index())
    }

    pub fn order_by_number(&self, number: &str) -> Option<&Order> {
        self.order_index.get(number).and_then(|&id| self.order(id))
    }

    pub fn item_by_key(&self, key: &str) -> Option<&Item> {
        self.item_index.get(key).and_then(|&id| self.item(id))
    }

    /// Edge between an order and an item, if any
    pub fn edge_between(&self, order: OrderId, item: ItemId) -> Option<&Edge> {
        self.edge_index.get(&(order, item)).and_then(|&id| self.edge(id))
    }

    /// Edges of an order, in insertion order
    pub fn order_edges(&self, id: OrderId) -> impl Iterator<Item = &Edge> + '_ {
        self.order_edges
            .get(id.index())
            .into_iter()
            .flatten()
            .map(move |e| &self.edges[e.index()])
    }

    /// Edges of an item, in insertion order
    pub fn item_edges(&self, id: ItemId) -> impl Iterator<Item = &Edge> + '_ {
        self.item_edges
            .get(id.index())
            .into_iter()
            .flatten()
            .map(move |e| &self.edges[e.index()])
    }

    /// Number of orders that bought this item (its degree)
    pub fn item_order_count(&self, id: ItemId) -> usize {
        self.item_edges.get(id.index()).map_or(0, Vec::len)
    }

    /// Number of items on this order (its degree)
    pub fn order_item_count(&self, id: OrderId) -> usize {
        self.order_edges.get(id.index()).map_or(0, Vec::len)
    }

    /// Total amount spent on an item across all orders
    pub fn item_total_spend(&self, id: ItemId) -> f64 {
        self.item_edges(id).map(|e| e.amount).sum()
    }

    /// Orders that list more than one supplier
    pub fn multi_supplier_orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.orders.iter().filter(|o| o.is_multiple())
    }
}
