//! Bank accounts and their balance history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::latest_snapshot;
use super::{Asset, Audit, Snapshot, ValueEntry, ValueInput, ValueTable};
use crate::error::{BalancesError, Result};
use crate::filter::Field;

db_enum!(
    /// Lifecycle of a bank account. `Inactive` is terminal for balance edits.
    BankAccountStatus "bank account status" {
        Active => "active",
        Inactive => "inactive",
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: Uuid,
    pub account_name: String,
    pub bank_name: String,
    pub account_holder_name: String,
    pub account_number: String,
    pub last_balance: f64,
    pub last_balance_date: DateTime<Utc>,
    pub status: BankAccountStatus,
    #[serde(flatten)]
    pub audit: Audit,
    #[serde(default)]
    pub balances: Vec<ValueEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccountInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub account_name: String,
    pub bank_name: String,
    pub account_holder_name: String,
    pub account_number: String,
    pub last_balance: f64,
    pub last_balance_date: DateTime<Utc>,
    pub status: BankAccountStatus,
}

impl Asset for BankAccount {
    const ENTITY: &'static str = "Bank Account";
    const VALUE_ENTITY: &'static str = "Bank Account Balance";
    const TABLE: &'static str = "bank_accounts";
    const VALUES: ValueTable = ValueTable {
        table: "bank_account_balances",
        parent_column: "bank_account_entity_id",
        amount_column: "balance",
    };

    type Status = BankAccountStatus;
    type Input = BankAccountInput;

    fn id(&self) -> Uuid {
        self.id
    }

    fn audit(&self) -> &Audit {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut Audit {
        &mut self.audit
    }

    fn status(&self) -> BankAccountStatus {
        self.status
    }

    fn is_terminal(&self) -> bool {
        self.status == BankAccountStatus::Inactive
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            amount: self.last_balance,
            date: self.last_balance_date,
        }
    }

    fn write_snapshot(&mut self, snapshot: Snapshot) {
        self.last_balance = snapshot.amount;
        self.last_balance_date = snapshot.date;
    }

    fn values(&self) -> &[ValueEntry] {
        &self.balances
    }

    fn values_mut(&mut self) -> &mut Vec<ValueEntry> {
        &mut self.balances
    }

    fn keyword_fields() -> Vec<Field> {
        ["account_name", "bank_name", "account_number", "account_holder_name"]
            .into_iter()
            .map(Self::field)
            .collect()
    }

    fn input_id(input: &BankAccountInput) -> Option<Uuid> {
        input.id
    }

    fn from_input(input: &BankAccountInput, actor: Uuid, now: DateTime<Utc>) -> Result<Self> {
        let seed = ValueInput::new(input.last_balance_date, input.last_balance);
        seed.validate()?;

        let id = input.id.unwrap_or_else(Uuid::now_v7);
        let balances = vec![ValueEntry::new(id, &seed, actor, now)];
        let snapshot = latest_snapshot(&balances)
            .ok_or_else(|| BalancesError::bad_request("bank account needs an opening balance"))?;

        Ok(Self {
            id,
            account_name: input.account_name.clone(),
            bank_name: input.bank_name.clone(),
            account_holder_name: input.account_holder_name.clone(),
            account_number: input.account_number.clone(),
            last_balance: snapshot.amount,
            last_balance_date: snapshot.date,
            status: input.status,
            audit: Audit::new(actor, now),
            balances,
        })
    }

    fn apply_input(&mut self, input: &BankAccountInput) {
        self.account_name = input.account_name.clone();
        self.bank_name = input.bank_name.clone();
        self.account_holder_name = input.account_holder_name.clone();
        self.account_number = input.account_number.clone();
        self.status = input.status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn input() -> BankAccountInput {
        BankAccountInput {
            id: None,
            account_name: "Daily".to_string(),
            bank_name: "First Bank".to_string(),
            account_holder_name: "Sam".to_string(),
            account_number: "0001".to_string(),
            last_balance: 1200.0,
            last_balance_date: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            status: BankAccountStatus::Active,
        }
    }

    #[test]
    fn test_seeds_one_balance() {
        let account = BankAccount::from_input(&input(), Uuid::now_v7(), Utc::now()).unwrap();
        assert_eq!(account.balances.len(), 1);
        assert_eq!(account.balances[0].parent_id, account.id);
        assert_eq!(account.snapshot(), account.balances[0].snapshot());
    }

    #[test]
    fn test_update_keeps_snapshot() {
        let actor = Uuid::now_v7();
        let mut account = BankAccount::from_input(&input(), actor, Utc::now()).unwrap();
        let mut edit = input();
        edit.last_balance = 1.0;
        edit.account_name = "Savings".to_string();
        edit.status = BankAccountStatus::Inactive;

        account.update(&edit, actor, Utc::now()).unwrap();
        assert_eq!(account.account_name, "Savings");
        assert_eq!(account.last_balance, 1200.0);
        assert!(account.is_terminal());
        assert_eq!(account.audit.updated_by, Some(actor));
    }

    #[test]
    fn test_delete_cascades_and_is_not_repeatable() {
        let actor = Uuid::now_v7();
        let mut account = BankAccount::from_input(&input(), actor, Utc::now()).unwrap();
        account.delete(actor, Utc::now()).unwrap();
        assert!(account.is_deleted());
        assert!(account.balances.iter().all(ValueEntry::is_deleted));

        let err = account.delete(actor, Utc::now()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "[OperationNotPermitted] delete on Bank Account: already deleted"
        );
        assert!(account.update(&input(), actor, Utc::now()).is_err());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!(
            "Inactive".parse::<BankAccountStatus>().unwrap(),
            BankAccountStatus::Inactive
        );
        assert!("closed".parse::<BankAccountStatus>().is_err());
        assert_eq!(BankAccountStatus::Active.to_string(), "active");
    }
}
