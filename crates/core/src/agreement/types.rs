//! Agreement and installment domain types.
//!
//! This module defines the core records of the obligation engine: the
//! payment agreement attached to a legal case and the installments its
//! total value is distributed across. Status enums keep their Brazilian
//! wire vocabulary (`pendente`, `recebida`, ...) on the serialization
//! boundary while code uses English names.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use lexum_shared::types::{AgreementId, CaseId, DocumentId, InstallmentId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Legal nature of the obligation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgreementKind {
    /// Negotiated settlement between the parties (`acordo`).
    #[serde(rename = "acordo")]
    Negotiated,
    /// Court-ordered award (`condenacao`).
    #[serde(rename = "condenacao")]
    Judgment,
    /// Court costs (`custas`).
    #[serde(rename = "custas")]
    CourtCosts,
}

impl AgreementKind {
    /// Returns the wire representation of the kind.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Negotiated => "acordo",
            Self::Judgment => "condenacao",
            Self::CourtCosts => "custas",
        }
    }

    /// Parses a kind from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "acordo" => Some(Self::Negotiated),
            "condenacao" => Some(Self::Judgment),
            "custas" => Some(Self::CourtCosts),
            _ => None,
        }
    }
}

impl fmt::Display for AgreementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of the money flow relative to the law office.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgreementDirection {
    /// The office receives money on behalf of the client (`recebimento`).
    #[serde(rename = "recebimento")]
    Receivable,
    /// The office pays money out (`pagamento`).
    #[serde(rename = "pagamento")]
    Payable,
}

impl AgreementDirection {
    /// Returns the wire representation of the direction.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Receivable => "recebimento",
            Self::Payable => "pagamento",
        }
    }

    /// Parses a direction from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "recebimento" => Some(Self::Receivable),
            "pagamento" => Some(Self::Payable),
            _ => None,
        }
    }
}

impl fmt::Display for AgreementDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the agreement total is distributed across installments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionMode {
    /// Equal shares, cent remainder on the last installment (`igual`).
    #[serde(rename = "igual")]
    Equal,
    /// Shares proportional to an external weight vector (`ponderada`).
    #[serde(rename = "ponderada")]
    Weighted,
}

impl DistributionMode {
    /// Returns the wire representation of the mode.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "igual",
            Self::Weighted => "ponderada",
        }
    }

    /// Parses a mode from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "igual" => Some(Self::Equal),
            "ponderada" => Some(Self::Weighted),
            _ => None,
        }
    }
}

/// Stored installment status.
///
/// `atrasada` (overdue) is intentionally absent: it is derived from
/// `Pending` plus the due date, never persisted. See
/// [`installment_effective_status`](crate::agreement::installment_effective_status).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InstallmentStatus {
    /// Awaiting settlement (`pendente`).
    #[serde(rename = "pendente")]
    Pending,
    /// Money came in on a receivable installment (`recebida`).
    #[serde(rename = "recebida")]
    Received,
    /// Money went out on a payable installment (`paga`).
    #[serde(rename = "paga")]
    Paid,
    /// Voided with an audit reason (`cancelada`).
    #[serde(rename = "cancelada")]
    Cancelled,
}

impl InstallmentStatus {
    /// Returns the wire representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pendente",
            Self::Received => "recebida",
            Self::Paid => "paga",
            Self::Cancelled => "cancelada",
        }
    }

    /// Parses a status from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pendente" => Some(Self::Pending),
            "recebida" => Some(Self::Received),
            "paga" => Some(Self::Paid),
            "cancelada" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Returns true if money has moved on this installment.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Received | Self::Paid)
    }

    /// Returns true if the installment can no longer change state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Received | Self::Paid | Self::Cancelled)
    }
}

impl fmt::Display for InstallmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Effective installment status as shown to users.
///
/// Extends [`InstallmentStatus`] with the derived `atrasada` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectiveInstallmentStatus {
    /// Awaiting settlement, not yet due (`pendente`).
    #[serde(rename = "pendente")]
    Pending,
    /// Awaiting settlement past its due date (`atrasada`).
    #[serde(rename = "atrasada")]
    Overdue,
    /// Money came in (`recebida`).
    #[serde(rename = "recebida")]
    Received,
    /// Money went out (`paga`).
    #[serde(rename = "paga")]
    Paid,
    /// Voided (`cancelada`).
    #[serde(rename = "cancelada")]
    Cancelled,
}

/// Aggregate agreement status, always derived from the installments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgreementStatus {
    /// No installment settled yet (`pendente`).
    #[serde(rename = "pendente")]
    Pending,
    /// Some but not all installments settled (`pago_parcial`).
    #[serde(rename = "pago_parcial")]
    PartiallyPaid,
    /// Every non-cancelled installment settled (`pago_total`).
    #[serde(rename = "pago_total")]
    FullyPaid,
    /// At least one installment is overdue (`atrasado`).
    #[serde(rename = "atrasado")]
    Overdue,
}

impl AgreementStatus {
    /// Returns the wire representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pendente",
            Self::PartiallyPaid => "pago_parcial",
            Self::FullyPaid => "pago_total",
            Self::Overdue => "atrasado",
        }
    }
}

impl fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a settlement was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Instant transfer (`pix`).
    #[serde(rename = "pix")]
    Pix,
    /// Wire transfer (`ted`).
    #[serde(rename = "ted")]
    Ted,
    /// Bank slip (`boleto`).
    #[serde(rename = "boleto")]
    Boleto,
    /// Court-held deposit released to the office (`deposito_judicial`).
    #[serde(rename = "deposito_judicial")]
    JudicialDeposit,
    /// Paper cheque (`cheque`).
    #[serde(rename = "cheque")]
    Cheque,
    /// Cash (`dinheiro`).
    #[serde(rename = "dinheiro")]
    Cash,
}

impl PaymentMethod {
    /// Returns the wire representation of the method.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pix => "pix",
            Self::Ted => "ted",
            Self::Boleto => "boleto",
            Self::JudicialDeposit => "deposito_judicial",
            Self::Cheque => "cheque",
            Self::Cash => "dinheiro",
        }
    }

    /// Parses a method from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pix" => Some(Self::Pix),
            "ted" => Some(Self::Ted),
            "boleto" => Some(Self::Boleto),
            "deposito_judicial" => Some(Self::JudicialDeposit),
            "cheque" => Some(Self::Cheque),
            "dinheiro" => Some(Self::Cash),
            _ => None,
        }
    }
}

/// Client-repayment (disbursement) workflow state of an installment.
///
/// The valid transitions are:
/// - NotApplicable → AwaitingDeclaration (settlement with repayment owed)
/// - AwaitingDeclaration → AwaitingTransfer (declaration attached)
/// - AwaitingTransfer → Disbursed (transfer registered)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisbursementStatus {
    /// No client repayment is owed (`nao_aplicavel`).
    #[serde(rename = "nao_aplicavel")]
    NotApplicable,
    /// Waiting for the signed client declaration (`pendente_declaracao`).
    #[serde(rename = "pendente_declaracao")]
    AwaitingDeclaration,
    /// Declaration on file, waiting for the transfer (`pendente_transferencia`).
    #[serde(rename = "pendente_transferencia")]
    AwaitingTransfer,
    /// Client repayment completed (`repassado`).
    #[serde(rename = "repassado")]
    Disbursed,
}

impl DisbursementStatus {
    /// Returns the wire representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotApplicable => "nao_aplicavel",
            Self::AwaitingDeclaration => "pendente_declaracao",
            Self::AwaitingTransfer => "pendente_transferencia",
            Self::Disbursed => "repassado",
        }
    }

    /// Parses a status from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "nao_aplicavel" => Some(Self::NotApplicable),
            "pendente_declaracao" => Some(Self::AwaitingDeclaration),
            "pendente_transferencia" => Some(Self::AwaitingTransfer),
            "repassado" => Some(Self::Disbursed),
            _ => None,
        }
    }

    /// Returns true if the installment sits in the disbursement queue.
    #[must_use]
    pub fn is_awaiting(&self) -> bool {
        matches!(self, Self::AwaitingDeclaration | Self::AwaitingTransfer)
    }
}

impl fmt::Display for DisbursementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spacing between consecutive installment due dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrenceInterval {
    /// Same day each month, clamped to month end when shorter.
    Monthly,
    /// Every 14 days.
    Biweekly,
    /// Every 7 days.
    Weekly,
    /// Every fixed number of days.
    EveryDays(u32),
}

impl RecurrenceInterval {
    /// Due date of the installment at `index` (0-based), counted from the
    /// first due date.
    ///
    /// Monthly schedules clamp to the last day of shorter months, so a
    /// Jan 31 start yields Feb 28/29, Mar 31, Apr 30. Returns `None` only
    /// when the date arithmetic overflows the calendar range.
    #[must_use]
    pub fn due_date(&self, first: NaiveDate, index: u32) -> Option<NaiveDate> {
        match self {
            Self::Monthly => first.checked_add_months(Months::new(index)),
            Self::Biweekly => first.checked_add_days(Days::new(u64::from(index) * 14)),
            Self::Weekly => first.checked_add_days(Days::new(u64::from(index) * 7)),
            Self::EveryDays(n) => {
                first.checked_add_days(Days::new(u64::from(index) * u64::from(*n)))
            }
        }
    }
}

/// A payment agreement attached to a legal case.
///
/// The aggregate status is never stored here; it is derived from the
/// installment set by [`derive_agreement_status`](crate::agreement::derive_agreement_status).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agreement {
    /// Unique identifier.
    pub id: AgreementId,
    /// The legal case this obligation belongs to.
    pub case_id: CaseId,
    /// Legal nature of the obligation.
    pub kind: AgreementKind,
    /// Whether the office receives or pays.
    pub direction: AgreementDirection,
    /// Total agreed value, gross of fees.
    pub total_value: Decimal,
    /// Number of installments the total is distributed across.
    pub installment_count: u32,
    /// Due date of the first installment.
    pub first_due_date: NaiveDate,
    /// Spacing between consecutive due dates.
    pub interval: RecurrenceInterval,
    /// Equal or weighted distribution.
    pub distribution_mode: DistributionMode,
    /// Contractual office share, in percent (0-100).
    pub office_percent: Decimal,
    /// Total success fees on top of the contractual share.
    pub success_fees: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Agreement {
    /// The client share, in percent.
    #[must_use]
    pub fn client_percent(&self) -> Decimal {
        Decimal::ONE_HUNDRED - self.office_percent
    }
}

/// One installment of an agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    /// Unique identifier.
    pub id: InstallmentId,
    /// The agreement this installment belongs to.
    pub agreement_id: AgreementId,
    /// 1-based position in the schedule.
    pub sequence: u32,
    /// Scheduled due date.
    pub due_date: NaiveDate,
    /// Gross principal of this installment.
    pub gross_principal: Decimal,
    /// Contractual office fee carved out of the principal.
    pub contractual_fee: Decimal,
    /// Success-fee share allocated to this installment.
    pub success_fee: Decimal,
    /// Amount owed back to the client:
    /// `gross_principal - (contractual_fee + success_fee)`.
    pub client_repayment: Decimal,
    /// Stored status (`atrasada` is derived, never stored).
    pub status: InstallmentStatus,
    /// Date money actually moved, set on settlement.
    pub settlement_date: Option<NaiveDate>,
    /// How the settlement was paid.
    pub payment_method: Option<PaymentMethod>,
    /// Client-repayment workflow state.
    pub disbursement_status: DisbursementStatus,
    /// Set when amounts were edited away from the generated schedule.
    pub manually_edited: bool,
    /// Audit reason recorded on cancellation.
    pub cancellation_reason: Option<String>,
    /// Signed client declaration backing the disbursement.
    pub declaration_ref: Option<DocumentId>,
    /// When the declaration was attached.
    pub declared_at: Option<DateTime<Utc>>,
    /// Proof of transfer registered on disbursement.
    pub disbursement_proof_ref: Option<DocumentId>,
    /// Date the client repayment was transferred.
    pub disbursement_date: Option<NaiveDate>,
    /// Who registered the disbursement.
    pub disbursed_by: Option<UserId>,
    /// Optimistic concurrency version, bumped on every update.
    pub version: i64,
}

impl Installment {
    /// Total amount the office keeps on this installment.
    #[must_use]
    pub fn office_amount(&self) -> Decimal {
        self.contractual_fee + self.success_fee
    }

    /// True when the installment is pending and strictly past its due date.
    #[must_use]
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == InstallmentStatus::Pending && self.due_date < today
    }
}
