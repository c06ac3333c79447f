use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use packtrace_core::{Aggregate, AggregateId, AggregateRoot, DomainError, Event, TenantId};
use packtrace_products::ProductId;

/// Sales order identifier (tenant-scoped via `tenant_id` fields in events/commands).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SalesOrderId(pub AggregateId);

impl SalesOrderId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for SalesOrderId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Order line identifier. Audit records reference lines by this id.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderLineId(pub AggregateId);

impl OrderLineId {
    pub fn new(id: AggregateId) -> Self {
        Self(id)
    }
}

impl core::fmt::Display for OrderLineId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// Sales order status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesOrderStatus {
    Draft,
    Confirmed,
    Cancelled,
}

/// Order line. Lines without a product are notes/sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub line_id: OrderLineId,
    pub line_no: u32,
    pub product_id: Option<ProductId>,
    pub quantity: i64,
}

/// Aggregate root: SalesOrder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesOrder {
    id: SalesOrderId,
    tenant_id: Option<TenantId>,
    name: String,
    status: SalesOrderStatus,
    lines: Vec<OrderLine>,
    version: u64,
    created: bool,
}

impl SalesOrder {
    /// Create an empty, not-yet-created aggregate instance.
    pub fn empty(id: SalesOrderId) -> Self {
        Self {
            id,
            tenant_id: None,
            name: String::new(),
            status: SalesOrderStatus::Draft,
            lines: Vec::new(),
            version: 0,
            created: false,
        }
    }

    pub fn id_typed(&self) -> SalesOrderId {
        self.id
    }

    pub fn tenant_id(&self) -> Option<TenantId> {
        self.tenant_id
    }

    /// Human-readable order reference (e.g. "SO001").
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> SalesOrderStatus {
        self.status
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn is_created(&self) -> bool {
        self.created
    }

    pub fn is_modifiable(&self) -> bool {
        matches!(self.status, SalesOrderStatus::Draft)
    }
}

impl AggregateRoot for SalesOrder {
    type Id = SalesOrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: CreateSalesOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSalesOrder {
    pub tenant_id: TenantId,
    pub order_id: SalesOrderId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: AddLine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddLine {
    pub tenant_id: TenantId,
    pub order_id: SalesOrderId,
    pub line_id: OrderLineId,
    pub product_id: Option<ProductId>,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveLine. Only draft orders lose lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveLine {
    pub tenant_id: TenantId,
    pub order_id: SalesOrderId,
    pub line_id: OrderLineId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ConfirmOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmOrder {
    pub tenant_id: TenantId,
    pub order_id: SalesOrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: CancelOrder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOrder {
    pub tenant_id: TenantId,
    pub order_id: SalesOrderId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalesOrderCommand {
    CreateSalesOrder(CreateSalesOrder),
    AddLine(AddLine),
    RemoveLine(RemoveLine),
    ConfirmOrder(ConfirmOrder),
    CancelOrder(CancelOrder),
}

impl SalesOrderCommand {
    /// Order targeted by the command.
    pub fn order_id(&self) -> SalesOrderId {
        match self {
            SalesOrderCommand::CreateSalesOrder(c) => c.order_id,
            SalesOrderCommand::AddLine(c) => c.order_id,
            SalesOrderCommand::RemoveLine(c) => c.order_id,
            SalesOrderCommand::ConfirmOrder(c) => c.order_id,
            SalesOrderCommand::CancelOrder(c) => c.order_id,
        }
    }

    pub fn tenant_id(&self) -> TenantId {
        match self {
            SalesOrderCommand::CreateSalesOrder(c) => c.tenant_id,
            SalesOrderCommand::AddLine(c) => c.tenant_id,
            SalesOrderCommand::RemoveLine(c) => c.tenant_id,
            SalesOrderCommand::ConfirmOrder(c) => c.tenant_id,
            SalesOrderCommand::CancelOrder(c) => c.tenant_id,
        }
    }
}

/// Event: SalesOrderCreated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesOrderCreated {
    pub tenant_id: TenantId,
    pub order_id: SalesOrderId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineAdded {
    pub tenant_id: TenantId,
    pub order_id: SalesOrderId,
    pub line_id: OrderLineId,
    pub line_no: u32,
    pub product_id: Option<ProductId>,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Event: LineRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRemoved {
    pub tenant_id: TenantId,
    pub order_id: SalesOrderId,
    pub line_id: OrderLineId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderConfirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmed {
    pub tenant_id: TenantId,
    pub order_id: SalesOrderId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: OrderCancelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelled {
    pub tenant_id: TenantId,
    pub order_id: SalesOrderId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalesOrderEvent {
    SalesOrderCreated(SalesOrderCreated),
    LineAdded(LineAdded),
    LineRemoved(LineRemoved),
    OrderConfirmed(OrderConfirmed),
    OrderCancelled(OrderCancelled),
}

impl Event for SalesOrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SalesOrderEvent::SalesOrderCreated(_) => "sales.order.created",
            SalesOrderEvent::LineAdded(_) => "sales.order.line_added",
            SalesOrderEvent::LineRemoved(_) => "sales.order.line_removed",
            SalesOrderEvent::OrderConfirmed(_) => "sales.order.confirmed",
            SalesOrderEvent::OrderCancelled(_) => "sales.order.cancelled",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SalesOrderEvent::SalesOrderCreated(e) => e.occurred_at,
            SalesOrderEvent::LineAdded(e) => e.occurred_at,
            SalesOrderEvent::LineRemoved(e) => e.occurred_at,
            SalesOrderEvent::OrderConfirmed(e) => e.occurred_at,
            SalesOrderEvent::OrderCancelled(e) => e.occurred_at,
        }
    }
}

impl Aggregate for SalesOrder {
    type Command = SalesOrderCommand;
    type Event = SalesOrderEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            SalesOrderEvent::SalesOrderCreated(e) => {
                self.id = e.order_id;
                self.tenant_id = Some(e.tenant_id);
                self.name = e.name.clone();
                self.status = SalesOrderStatus::Draft;
                self.lines.clear();
                self.created = true;
            }
            SalesOrderEvent::LineAdded(e) => {
                self.lines.push(OrderLine {
                    line_id: e.line_id,
                    line_no: e.line_no,
                    product_id: e.product_id,
                    quantity: e.quantity,
                });
            }
            SalesOrderEvent::LineRemoved(e) => {
                self.lines.retain(|l| l.line_id != e.line_id);
            }
            SalesOrderEvent::OrderConfirmed(_) => {
                self.status = SalesOrderStatus::Confirmed;
            }
            SalesOrderEvent::OrderCancelled(_) => {
                self.status = SalesOrderStatus::Cancelled;
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            SalesOrderCommand::CreateSalesOrder(cmd) => self.handle_create(cmd),
            SalesOrderCommand::AddLine(cmd) => self.handle_add_line(cmd),
            SalesOrderCommand::RemoveLine(cmd) => self.handle_remove_line(cmd),
            SalesOrderCommand::ConfirmOrder(cmd) => self.handle_confirm(cmd),
            SalesOrderCommand::CancelOrder(cmd) => self.handle_cancel(cmd),
        }
    }
}

impl SalesOrder {
    fn ensure_tenant(&self, tenant_id: TenantId) -> Result<(), DomainError> {
        if !self.created {
            return Ok(());
        }
        if self.tenant_id != Some(tenant_id) {
            return Err(DomainError::invariant("tenant mismatch"));
        }
        Ok(())
    }

    fn ensure_order_id(&self, order_id: SalesOrderId) -> Result<(), DomainError> {
        if self.id != order_id {
            return Err(DomainError::invariant("order_id mismatch"));
        }
        Ok(())
    }

    fn ensure_existing(&self, tenant_id: TenantId, order_id: SalesOrderId) -> Result<(), DomainError> {
        if !self.created {
            return Err(DomainError::not_found());
        }
        self.ensure_tenant(tenant_id)?;
        self.ensure_order_id(order_id)
    }

    fn handle_create(&self, cmd: &CreateSalesOrder) -> Result<Vec<SalesOrderEvent>, DomainError> {
        if self.created {
            return Err(DomainError::conflict("sales order already exists"));
        }

        let name = cmd.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("order name must not be empty"));
        }

        Ok(vec![SalesOrderEvent::SalesOrderCreated(SalesOrderCreated {
            tenant_id: cmd.tenant_id,
            order_id: cmd.order_id,
            name: name.to_string(),
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_add_line(&self, cmd: &AddLine) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_existing(cmd.tenant_id, cmd.order_id)?;

        if !self.is_modifiable() {
            return Err(DomainError::invariant(
                "cannot modify order once it is confirmed or cancelled",
            ));
        }

        if self.lines.iter().any(|l| l.line_id == cmd.line_id) {
            return Err(DomainError::conflict("line already exists on this order"));
        }

        if cmd.product_id.is_some() && cmd.quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        let next_line_no = self.lines.iter().map(|l| l.line_no).max().unwrap_or(0) + 1;

        Ok(vec![SalesOrderEvent::LineAdded(LineAdded {
            tenant_id: cmd.tenant_id,
            order_id: cmd.order_id,
            line_id: cmd.line_id,
            line_no: next_line_no,
            product_id: cmd.product_id,
            quantity: cmd.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove_line(&self, cmd: &RemoveLine) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_existing(cmd.tenant_id, cmd.order_id)?;

        if !self.is_modifiable() {
            return Err(DomainError::invariant(
                "cannot modify order once it is confirmed or cancelled",
            ));
        }

        if !self.lines.iter().any(|l| l.line_id == cmd.line_id) {
            return Err(DomainError::not_found());
        }

        Ok(vec![SalesOrderEvent::LineRemoved(LineRemoved {
            tenant_id: cmd.tenant_id,
            order_id: cmd.order_id,
            line_id: cmd.line_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_confirm(&self, cmd: &ConfirmOrder) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_existing(cmd.tenant_id, cmd.order_id)?;

        if self.status != SalesOrderStatus::Draft {
            return Err(DomainError::invariant("only draft orders can be confirmed"));
        }

        if self.lines.is_empty() {
            return Err(DomainError::validation("cannot confirm order without lines"));
        }

        Ok(vec![SalesOrderEvent::OrderConfirmed(OrderConfirmed {
            tenant_id: cmd.tenant_id,
            order_id: cmd.order_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_cancel(&self, cmd: &CancelOrder) -> Result<Vec<SalesOrderEvent>, DomainError> {
        self.ensure_existing(cmd.tenant_id, cmd.order_id)?;

        if self.status == SalesOrderStatus::Cancelled {
            return Err(DomainError::invariant("order is already cancelled"));
        }

        Ok(vec![SalesOrderEvent::OrderCancelled(OrderCancelled {
            tenant_id: cmd.tenant_id,
            order_id: cmd.order_id,
            occurred_at: cmd.occurred_at,
        })])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packtrace_core::execute;

    fn test_tenant_id() -> TenantId {
        TenantId::new()
    }

    fn test_order_id() -> SalesOrderId {
        SalesOrderId::new(AggregateId::new())
    }

    fn test_line_id() -> OrderLineId {
        OrderLineId::new(AggregateId::new())
    }

    fn test_product_id() -> ProductId {
        ProductId::new(AggregateId::new())
    }

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn created_order(tenant_id: TenantId, order_id: SalesOrderId) -> SalesOrder {
        let mut order = SalesOrder::empty(order_id);
        execute(
            &mut order,
            &SalesOrderCommand::CreateSalesOrder(CreateSalesOrder {
                tenant_id,
                order_id,
                name: "SO001".to_string(),
                occurred_at: test_time(),
            }),
        )
        .unwrap();
        order
    }

    fn add_line(order: &mut SalesOrder, tenant_id: TenantId, product_id: Option<ProductId>) -> OrderLineId {
        let line_id = test_line_id();
        let order_id = order.id_typed();
        execute(
            order,
            &SalesOrderCommand::AddLine(AddLine {
                tenant_id,
                order_id,
                line_id,
                product_id,
                quantity: if product_id.is_some() { 1 } else { 0 },
                occurred_at: test_time(),
            }),
        )
        .unwrap();
        line_id
    }

    fn confirm_cmd(tenant_id: TenantId, order_id: SalesOrderId) -> SalesOrderCommand {
        SalesOrderCommand::ConfirmOrder(ConfirmOrder {
            tenant_id,
            order_id,
            occurred_at: test_time(),
        })
    }

    #[test]
    fn create_sales_order_emits_created_event_with_name() {
        let tenant_id = test_tenant_id();
        let order_id = test_order_id();
        let order = SalesOrder::empty(order_id);

        let events = order
            .handle(&SalesOrderCommand::CreateSalesOrder(CreateSalesOrder {
                tenant_id,
                order_id,
                name: "  SO001 ".to_string(),
                occurred_at: test_time(),
            }))
            .unwrap();
        assert_eq!(events.len(), 1);

        match &events[0] {
            SalesOrderEvent::SalesOrderCreated(e) => {
                assert_eq!(e.tenant_id, tenant_id);
                assert_eq!(e.order_id, order_id);
                assert_eq!(e.name, "SO001");
            }
            _ => panic!("Expected SalesOrderCreated event"),
        }
    }

    #[test]
    fn blank_name_is_rejected() {
        let order_id = test_order_id();
        let err = SalesOrder::empty(order_id)
            .handle(&SalesOrderCommand::CreateSalesOrder(CreateSalesOrder {
                tenant_id: test_tenant_id(),
                order_id,
                name: "   ".to_string(),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn lines_keep_their_ids_and_numbering() {
        let tenant_id = test_tenant_id();
        let mut order = created_order(tenant_id, test_order_id());

        let first = add_line(&mut order, tenant_id, Some(test_product_id()));
        let note = add_line(&mut order, tenant_id, None);

        assert_eq!(order.lines().len(), 2);
        assert_eq!(order.lines()[0].line_id, first);
        assert_eq!(order.lines()[0].line_no, 1);
        assert_eq!(order.lines()[1].line_id, note);
        assert_eq!(order.lines()[1].line_no, 2);
        assert_eq!(order.lines()[1].product_id, None);
    }

    #[test]
    fn product_line_requires_positive_quantity() {
        let tenant_id = test_tenant_id();
        let order = created_order(tenant_id, test_order_id());

        let err = order
            .handle(&SalesOrderCommand::AddLine(AddLine {
                tenant_id,
                order_id: order.id_typed(),
                line_id: test_line_id(),
                product_id: Some(test_product_id()),
                quantity: 0,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn duplicate_line_id_is_a_conflict() {
        let tenant_id = test_tenant_id();
        let mut order = created_order(tenant_id, test_order_id());
        let line_id = add_line(&mut order, tenant_id, Some(test_product_id()));

        let err = order
            .handle(&SalesOrderCommand::AddLine(AddLine {
                tenant_id,
                order_id: order.id_typed(),
                line_id,
                product_id: Some(test_product_id()),
                quantity: 1,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn removing_a_line_keeps_numbering_unique() {
        let tenant_id = test_tenant_id();
        let order_id = test_order_id();
        let mut order = created_order(tenant_id, order_id);
        let first = add_line(&mut order, tenant_id, Some(test_product_id()));
        add_line(&mut order, tenant_id, Some(test_product_id()));

        execute(
            &mut order,
            &SalesOrderCommand::RemoveLine(RemoveLine {
                tenant_id,
                order_id,
                line_id: first,
                occurred_at: test_time(),
            }),
        )
        .unwrap();
        add_line(&mut order, tenant_id, None);

        let numbers: Vec<u32> = order.lines().iter().map(|l| l.line_no).collect();
        assert_eq!(numbers, vec![2, 3]);
    }

    #[test]
    fn removing_unknown_line_is_not_found() {
        let tenant_id = test_tenant_id();
        let order_id = test_order_id();
        let order = created_order(tenant_id, order_id);

        let err = order
            .handle(&SalesOrderCommand::RemoveLine(RemoveLine {
                tenant_id,
                order_id,
                line_id: test_line_id(),
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn confirmed_order_keeps_its_lines() {
        let tenant_id = test_tenant_id();
        let order_id = test_order_id();
        let mut order = created_order(tenant_id, order_id);
        let line_id = add_line(&mut order, tenant_id, Some(test_product_id()));
        execute(&mut order, &confirm_cmd(tenant_id, order_id)).unwrap();

        let err = order
            .handle(&SalesOrderCommand::RemoveLine(RemoveLine {
                tenant_id,
                order_id,
                line_id,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn confirm_moves_draft_to_confirmed() {
        let tenant_id = test_tenant_id();
        let order_id = test_order_id();
        let mut order = created_order(tenant_id, order_id);
        add_line(&mut order, tenant_id, Some(test_product_id()));

        execute(&mut order, &confirm_cmd(tenant_id, order_id)).unwrap();
        assert_eq!(order.status(), SalesOrderStatus::Confirmed);
    }

    #[test]
    fn cannot_confirm_without_lines() {
        let tenant_id = test_tenant_id();
        let order_id = test_order_id();
        let order = created_order(tenant_id, order_id);

        let err = order.handle(&confirm_cmd(tenant_id, order_id)).unwrap_err();
        match err {
            DomainError::Validation(msg) if msg.contains("without lines") => {}
            other => panic!("Expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn cannot_confirm_twice() {
        let tenant_id = test_tenant_id();
        let order_id = test_order_id();
        let mut order = created_order(tenant_id, order_id);
        add_line(&mut order, tenant_id, Some(test_product_id()));
        execute(&mut order, &confirm_cmd(tenant_id, order_id)).unwrap();

        let err = order.handle(&confirm_cmd(tenant_id, order_id)).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn cannot_modify_confirmed_order() {
        let tenant_id = test_tenant_id();
        let order_id = test_order_id();
        let mut order = created_order(tenant_id, order_id);
        add_line(&mut order, tenant_id, Some(test_product_id()));
        execute(&mut order, &confirm_cmd(tenant_id, order_id)).unwrap();

        let err = order
            .handle(&SalesOrderCommand::AddLine(AddLine {
                tenant_id,
                order_id,
                line_id: test_line_id(),
                product_id: Some(test_product_id()),
                quantity: 1,
                occurred_at: test_time(),
            }))
            .unwrap_err();
        match err {
            DomainError::InvariantViolation(msg) if msg.contains("cannot modify order") => {}
            other => panic!("Expected InvariantViolation, got {other:?}"),
        }
    }

    #[test]
    fn cancelled_order_cannot_be_confirmed() {
        let tenant_id = test_tenant_id();
        let order_id = test_order_id();
        let mut order = created_order(tenant_id, order_id);
        add_line(&mut order, tenant_id, Some(test_product_id()));
        execute(
            &mut order,
            &SalesOrderCommand::CancelOrder(CancelOrder {
                tenant_id,
                order_id,
                occurred_at: test_time(),
            }),
        )
        .unwrap();

        assert_eq!(order.status(), SalesOrderStatus::Cancelled);
        assert!(order.handle(&confirm_cmd(tenant_id, order_id)).is_err());
    }

    #[test]
    fn other_tenant_cannot_confirm() {
        let tenant_id = test_tenant_id();
        let order_id = test_order_id();
        let mut order = created_order(tenant_id, order_id);
        add_line(&mut order, tenant_id, Some(test_product_id()));

        let err = order.handle(&confirm_cmd(test_tenant_id(), order_id)).unwrap_err();
        match err {
            DomainError::InvariantViolation(msg) if msg.contains("tenant mismatch") => {}
            other => panic!("Expected tenant mismatch, got {other:?}"),
        }
    }

    #[test]
    fn confirming_unknown_order_is_not_found() {
        let order_id = test_order_id();
        let err = SalesOrder::empty(order_id)
            .handle(&confirm_cmd(test_tenant_id(), order_id))
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn handle_does_not_mutate_state() {
        let tenant_id = test_tenant_id();
        let order_id = test_order_id();
        let mut order = created_order(tenant_id, order_id);
        add_line(&mut order, tenant_id, Some(test_product_id()));
        let before = order.clone();

        let events1 = order.handle(&confirm_cmd(tenant_id, order_id)).unwrap();
        let events2 = order.handle(&confirm_cmd(tenant_id, order_id)).unwrap();

        assert_eq!(order, before);
        assert_eq!(events1.len(), events2.len());
    }

    #[test]
    fn version_increments_on_apply() {
        let tenant_id = test_tenant_id();
        let order_id = test_order_id();
        let mut order = created_order(tenant_id, order_id);
        assert_eq!(order.version(), 1);

        add_line(&mut order, tenant_id, None);
        assert_eq!(order.version(), 2);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: replaying the same events yields the same order.
            #[test]
            fn apply_is_deterministic(
                name in "SO[0-9]{1,6}",
                quantities in proptest::collection::vec(1i64..100, 1..10)
            ) {
                let tenant_id = test_tenant_id();
                let order_id = test_order_id();
                let at = test_time();

                let mut events = vec![SalesOrderEvent::SalesOrderCreated(SalesOrderCreated {
                    tenant_id,
                    order_id,
                    name: name.clone(),
                    occurred_at: at,
                })];
                for (i, quantity) in quantities.iter().enumerate() {
                    events.push(SalesOrderEvent::LineAdded(LineAdded {
                        tenant_id,
                        order_id,
                        line_id: test_line_id(),
                        line_no: i as u32 + 1,
                        product_id: Some(test_product_id()),
                        quantity: *quantity,
                        occurred_at: at,
                    }));
                }
                events.push(SalesOrderEvent::OrderConfirmed(OrderConfirmed {
                    tenant_id,
                    order_id,
                    occurred_at: at,
                }));

                let mut a = SalesOrder::empty(order_id);
                let mut b = SalesOrder::empty(order_id);
                for e in &events {
                    a.apply(e);
                    b.apply(e);
                }

                prop_assert_eq!(&a, &b);
                prop_assert_eq!(a.name(), name.as_str());
                prop_assert_eq!(a.lines().len(), quantities.len());
                prop_assert_eq!(a.status(), SalesOrderStatus::Confirmed);
                prop_assert_eq!(a.version(), events.len() as u64);
            }
        }
    }
}
