//! Wire-format records and their domain conversions.
//!
//! Records mirror what a JSON-speaking backend would persist: camelCase
//! field names, statuses as strings, recurrence flattened into a kind
//! plus an optional day count. Decoding back into domain values is
//! fallible; a bad stored value surfaces as
//! [`StoreError::InvalidRecord`] instead of panicking inside the store.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lexum_core::agreement::types::{
    Agreement, AgreementDirection, AgreementKind, DisbursementStatus, DistributionMode,
    Installment, InstallmentStatus, PaymentMethod, RecurrenceInterval,
};
use lexum_core::ledger_sync::types::{EntryDirection, EntryStatus, LedgerEntry};
use lexum_core::reconciliation::types::{
    BankTransaction, Reconciliation, ReconciliationKind, ReconciliationStatus,
    TransactionDirection,
};
use lexum_shared::types::{
    AgreementId, BankTransactionId, CaseId, DocumentId, InstallmentId, LedgerEntryId,
    ReconciliationId, UserId,
};
use lexum_shared::StoreError;

fn bad_value(field: &'static str, value: &str) -> StoreError {
    StoreError::InvalidRecord(format!("{field}: unknown value '{value}'"))
}

/// Stored form of an [`Agreement`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementRecord {
    /// Primary key.
    pub id: Uuid,
    /// Owning legal case.
    pub case_id: Uuid,
    /// `acordo`, `condenacao`, or `custas`.
    pub kind: String,
    /// `recebimento` or `pagamento`.
    pub direction: String,
    /// Total agreed value.
    pub total_value: Decimal,
    /// Number of installments.
    pub installment_count: u32,
    /// First due date.
    pub first_due_date: NaiveDate,
    /// `monthly`, `biweekly`, `weekly`, or `every_days`.
    pub interval: String,
    /// Day count, set only for `every_days`.
    pub interval_days: Option<u32>,
    /// `igual` or `ponderada`.
    pub distribution_mode: String,
    /// Office share in percent.
    pub office_percent: Decimal,
    /// Total success fees.
    pub success_fees: Decimal,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<&Agreement> for AgreementRecord {
    fn from(agreement: &Agreement) -> Self {
        let (interval, interval_days) = match agreement.interval {
            RecurrenceInterval::Monthly => ("monthly", None),
            RecurrenceInterval::Biweekly => ("biweekly", None),
            RecurrenceInterval::Weekly => ("weekly", None),
            RecurrenceInterval::EveryDays(days) => ("every_days", Some(days)),
        };
        Self {
            id: agreement.id.into_inner(),
            case_id: agreement.case_id.into_inner(),
            kind: agreement.kind.as_str().to_string(),
            direction: agreement.direction.as_str().to_string(),
            total_value: agreement.total_value,
            installment_count: agreement.installment_count,
            first_due_date: agreement.first_due_date,
            interval: interval.to_string(),
            interval_days,
            distribution_mode: agreement.distribution_mode.as_str().to_string(),
            office_percent: agreement.office_percent,
            success_fees: agreement.success_fees,
            created_at: agreement.created_at,
            updated_at: agreement.updated_at,
        }
    }
}

impl TryFrom<AgreementRecord> for Agreement {
    type Error = StoreError;

    fn try_from(record: AgreementRecord) -> Result<Self, Self::Error> {
        let interval = match (record.interval.as_str(), record.interval_days) {
            ("monthly", _) => RecurrenceInterval::Monthly,
            ("biweekly", _) => RecurrenceInterval::Biweekly,
            ("weekly", _) => RecurrenceInterval::Weekly,
            ("every_days", Some(days)) => RecurrenceInterval::EveryDays(days),
            ("every_days", None) => {
                return Err(StoreError::InvalidRecord(
                    "interval: every_days without a day count".to_string(),
                ));
            }
            (other, _) => return Err(bad_value("interval", other)),
        };
        Ok(Self {
            id: AgreementId::from_uuid(record.id),
            case_id: CaseId::from_uuid(record.case_id),
            kind: AgreementKind::parse(&record.kind).ok_or_else(|| bad_value("kind", &record.kind))?,
            direction: AgreementDirection::parse(&record.direction)
                .ok_or_else(|| bad_value("direction", &record.direction))?,
            total_value: record.total_value,
            installment_count: record.installment_count,
            first_due_date: record.first_due_date,
            interval,
            distribution_mode: DistributionMode::parse(&record.distribution_mode)
                .ok_or_else(|| bad_value("distributionMode", &record.distribution_mode))?,
            office_percent: record.office_percent,
            success_fees: record.success_fees,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Stored form of an [`Installment`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentRecord {
    /// Primary key.
    pub id: Uuid,
    /// Owning agreement.
    pub agreement_id: Uuid,
    /// 1-based position in the schedule.
    pub sequence: u32,
    /// Scheduled due date.
    pub due_date: NaiveDate,
    /// Gross principal.
    pub gross_principal: Decimal,
    /// Contractual office fee.
    pub contractual_fee: Decimal,
    /// Success-fee share.
    pub success_fee: Decimal,
    /// Amount owed back to the client.
    pub client_repayment: Decimal,
    /// `pendente`, `recebida`, `paga`, or `cancelada`.
    pub status: String,
    /// Settlement date, once settled.
    pub settlement_date: Option<NaiveDate>,
    /// `pix`, `ted`, `boleto`, `deposito_judicial`, `cheque`, `dinheiro`.
    pub payment_method: Option<String>,
    /// Client-repayment workflow state.
    pub disbursement_status: String,
    /// Manual-edit flag.
    pub manually_edited: bool,
    /// Audit reason recorded on cancellation.
    pub cancellation_reason: Option<String>,
    /// Declaration document reference.
    pub declaration_ref: Option<Uuid>,
    /// Declaration attachment timestamp.
    pub declared_at: Option<DateTime<Utc>>,
    /// Disbursement proof reference.
    pub disbursement_proof_ref: Option<Uuid>,
    /// Date of the client-repayment transfer.
    pub disbursement_date: Option<NaiveDate>,
    /// User who registered the disbursement.
    pub disbursed_by: Option<Uuid>,
    /// Optimistic concurrency version.
    pub version: i64,
}

impl From<&Installment> for InstallmentRecord {
    fn from(installment: &Installment) -> Self {
        Self {
            id: installment.id.into_inner(),
            agreement_id: installment.agreement_id.into_inner(),
            sequence: installment.sequence,
            due_date: installment.due_date,
            gross_principal: installment.gross_principal,
            contractual_fee: installment.contractual_fee,
            success_fee: installment.success_fee,
            client_repayment: installment.client_repayment,
            status: installment.status.as_str().to_string(),
            settlement_date: installment.settlement_date,
            payment_method: installment
                .payment_method
                .map(|method| method.as_str().to_string()),
            disbursement_status: installment.disbursement_status.as_str().to_string(),
            manually_edited: installment.manually_edited,
            cancellation_reason: installment.cancellation_reason.clone(),
            declaration_ref: installment.declaration_ref.map(DocumentId::into_inner),
            declared_at: installment.declared_at,
            disbursement_proof_ref: installment
                .disbursement_proof_ref
                .map(DocumentId::into_inner),
            disbursement_date: installment.disbursement_date,
            disbursed_by: installment.disbursed_by.map(UserId::into_inner),
            version: installment.version,
        }
    }
}

impl TryFrom<InstallmentRecord> for Installment {
    type Error = StoreError;

    fn try_from(record: InstallmentRecord) -> Result<Self, Self::Error> {
        let payment_method = record
            .payment_method
            .as_deref()
            .map(|method| PaymentMethod::parse(method).ok_or_else(|| bad_value("paymentMethod", method)))
            .transpose()?;
        Ok(Self {
            id: InstallmentId::from_uuid(record.id),
            agreement_id: AgreementId::from_uuid(record.agreement_id),
            sequence: record.sequence,
            due_date: record.due_date,
            gross_principal: record.gross_principal,
            contractual_fee: record.contractual_fee,
            success_fee: record.success_fee,
            client_repayment: record.client_repayment,
            status: InstallmentStatus::parse(&record.status)
                .ok_or_else(|| bad_value("status", &record.status))?,
            settlement_date: record.settlement_date,
            payment_method,
            disbursement_status: DisbursementStatus::parse(&record.disbursement_status)
                .ok_or_else(|| bad_value("disbursementStatus", &record.disbursement_status))?,
            manually_edited: record.manually_edited,
            cancellation_reason: record.cancellation_reason,
            declaration_ref: record.declaration_ref.map(DocumentId::from_uuid),
            declared_at: record.declared_at,
            disbursement_proof_ref: record.disbursement_proof_ref.map(DocumentId::from_uuid),
            disbursement_date: record.disbursement_date,
            disbursed_by: record.disbursed_by.map(UserId::from_uuid),
            version: record.version,
        })
    }
}

/// Stored form of a [`LedgerEntry`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntryRecord {
    /// Primary key.
    pub id: Uuid,
    /// Linked installment, when synchronized from one.
    pub installment_id: Option<Uuid>,
    /// Human-readable description.
    pub description: String,
    /// Scheduled date.
    pub due_date: NaiveDate,
    /// Date the movement actually happened.
    pub effective_date: Option<NaiveDate>,
    /// Amount of the movement.
    pub amount: Decimal,
    /// `receita` or `despesa`.
    pub direction: String,
    /// `pendente`, `confirmado`, `cancelado`, or `estornado`.
    pub status: String,
    /// Set while an active reconciliation links this entry.
    pub reconciled: bool,
}

impl From<&LedgerEntry> for LedgerEntryRecord {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: entry.id.into_inner(),
            installment_id: entry.installment_id.map(InstallmentId::into_inner),
            description: entry.description.clone(),
            due_date: entry.due_date,
            effective_date: entry.effective_date,
            amount: entry.amount,
            direction: entry.direction.as_str().to_string(),
            status: entry.status.as_str().to_string(),
            reconciled: entry.reconciled,
        }
    }
}

impl TryFrom<LedgerEntryRecord> for LedgerEntry {
    type Error = StoreError;

    fn try_from(record: LedgerEntryRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: LedgerEntryId::from_uuid(record.id),
            installment_id: record.installment_id.map(InstallmentId::from_uuid),
            description: record.description,
            due_date: record.due_date,
            effective_date: record.effective_date,
            amount: record.amount,
            direction: EntryDirection::parse(&record.direction)
                .ok_or_else(|| bad_value("direction", &record.direction))?,
            status: EntryStatus::parse(&record.status)
                .ok_or_else(|| bad_value("status", &record.status))?,
            reconciled: record.reconciled,
        })
    }
}

/// Stored form of a [`BankTransaction`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankTransactionRecord {
    /// Primary key.
    pub id: Uuid,
    /// Statement date.
    pub date: NaiveDate,
    /// Statement description.
    pub description: String,
    /// Amount, always positive.
    pub amount: Decimal,
    /// `credito` or `debito`.
    pub direction: String,
    /// `pendente`, `sugerida`, or `conciliada`.
    pub status: String,
}

impl From<&BankTransaction> for BankTransactionRecord {
    fn from(transaction: &BankTransaction) -> Self {
        Self {
            id: transaction.id.into_inner(),
            date: transaction.date,
            description: transaction.description.clone(),
            amount: transaction.amount,
            direction: transaction.direction.as_str().to_string(),
            status: transaction.status.as_str().to_string(),
        }
    }
}

impl TryFrom<BankTransactionRecord> for BankTransaction {
    type Error = StoreError;

    fn try_from(record: BankTransactionRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: BankTransactionId::from_uuid(record.id),
            date: record.date,
            description: record.description,
            amount: record.amount,
            direction: TransactionDirection::parse(&record.direction)
                .ok_or_else(|| bad_value("direction", &record.direction))?,
            status: ReconciliationStatus::parse(&record.status)
                .ok_or_else(|| bad_value("status", &record.status))?,
        })
    }
}

/// Stored form of a [`Reconciliation`] link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationRecord {
    /// Primary key.
    pub id: Uuid,
    /// Bank side of the link.
    pub transaction_id: Uuid,
    /// Ledger side of the link.
    pub entry_id: Uuid,
    /// `manual` or `automatica`.
    pub kind: String,
    /// Who created the link, when known.
    pub created_by: Option<Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<&Reconciliation> for ReconciliationRecord {
    fn from(link: &Reconciliation) -> Self {
        Self {
            id: link.id.into_inner(),
            transaction_id: link.transaction_id.into_inner(),
            entry_id: link.entry_id.into_inner(),
            kind: link.kind.as_str().to_string(),
            created_by: link.created_by.map(UserId::into_inner),
            created_at: link.created_at,
        }
    }
}

impl TryFrom<ReconciliationRecord> for Reconciliation {
    type Error = StoreError;

    fn try_from(record: ReconciliationRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ReconciliationId::from_uuid(record.id),
            transaction_id: BankTransactionId::from_uuid(record.transaction_id),
            entry_id: LedgerEntryId::from_uuid(record.entry_id),
            kind: ReconciliationKind::parse(&record.kind)
                .ok_or_else(|| bad_value("kind", &record.kind))?,
            created_by: record.created_by.map(UserId::from_uuid),
            created_at: record.created_at,
        })
    }
}
