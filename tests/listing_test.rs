mod common;

use anyhow::Result;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use spendlog::application::LedgerService;
use spendlog::domain::{CategoryTotal, ExpenseQuery};

use common::{add, test_service};

async fn seed(service: &LedgerService) -> Result<()> {
    add(service, dec!(12.50), "Food", "2024-01-05", "k1").await?;
    add(service, dec!(7.25), "Transport", "2024-01-06", "k2").await?;
    add(service, dec!(3.333), "food", "2024-01-09", "k3").await?;
    add(service, dec!(40), "Food", "2024-01-02", "k4").await?;
    add(service, dec!(0.01), "Food", "2024-01-05", "k5").await?;
    Ok(())
}

fn ids(expenses: &[spendlog::domain::Expense]) -> Vec<i64> {
    expenses.iter().map(|e| e.id).collect()
}

#[tokio::test]
async fn test_list_defaults_to_insertion_order() -> Result<()> {
    let (service, _temp) = test_service().await?;
    seed(&service).await?;

    let all = service.list(&ExpenseQuery::all()).await?;
    assert_eq!(ids(&all), vec![1, 2, 3, 4, 5]);
    Ok(())
}

#[tokio::test]
async fn test_list_by_category_is_case_sensitive() -> Result<()> {
    let (service, _temp) = test_service().await?;
    seed(&service).await?;

    let food = service
        .list(&ExpenseQuery::all().with_category("Food"))
        .await?;
    assert_eq!(ids(&food), vec![1, 4, 5]);
    assert!(food.iter().all(|e| e.category == "Food"));

    let lower = service
        .list(&ExpenseQuery::all().with_category("food"))
        .await?;
    assert_eq!(ids(&lower), vec![3]);
    Ok(())
}

#[tokio::test]
async fn test_list_sorted_by_date_desc() -> Result<()> {
    let (service, _temp) = test_service().await?;
    seed(&service).await?;

    let sorted = service
        .list(&ExpenseQuery::all().sorted_by_date_desc())
        .await?;
    assert!(sorted.windows(2).all(|w| w[0].date >= w[1].date));
    // Same date keeps insertion order.
    assert_eq!(ids(&sorted), vec![3, 2, 1, 5, 4]);

    let food_sorted = service
        .list(&ExpenseQuery::all().with_category("Food").sorted_by_date_desc())
        .await?;
    assert_eq!(ids(&food_sorted), vec![1, 5, 4]);
    Ok(())
}

#[tokio::test]
async fn test_list_on_empty_ledger() -> Result<()> {
    let (service, _temp) = test_service().await?;

    assert!(service.list(&ExpenseQuery::all()).await?.is_empty());
    assert!(service
        .list(&ExpenseQuery::all().with_category("Food").sorted_by_date_desc())
        .await?
        .is_empty());
    Ok(())
}

#[tokio::test]
async fn test_total_is_exact_decimal_sum() -> Result<()> {
    let (service, _temp) = test_service().await?;
    assert_eq!(service.total().await?, Decimal::ZERO);

    seed(&service).await?;
    assert_eq!(service.total().await?, dec!(63.093));

    let listed: Decimal = service
        .list(&ExpenseQuery::all().sorted_by_date_desc())
        .await?
        .iter()
        .map(|e| e.amount)
        .sum();
    assert_eq!(listed, service.total().await?);
    Ok(())
}

#[tokio::test]
async fn test_total_has_no_float_drift() -> Result<()> {
    let (service, _temp) = test_service().await?;

    for i in 0..10 {
        add(&service, dec!(0.1), "Food", "2024-01-01", &format!("k{i}")).await?;
    }

    assert_eq!(service.total().await?, dec!(1));
    Ok(())
}

#[tokio::test]
async fn test_total_follows_updates_and_deletes() -> Result<()> {
    let (service, _temp) = test_service().await?;
    seed(&service).await?;

    service.delete(4).await?;
    service
        .update(2, common::expense(dec!(7.75), "Transport", "2024-01-06"))
        .await?;

    assert_eq!(service.total().await?, dec!(23.593));
    Ok(())
}

#[tokio::test]
async fn test_totals_by_category() -> Result<()> {
    let (service, _temp) = test_service().await?;
    seed(&service).await?;

    let totals = service.totals_by_category().await?;
    assert_eq!(
        totals,
        vec![
            CategoryTotal {
                category: "Food".into(),
                total: dec!(52.51),
                count: 3,
            },
            CategoryTotal {
                category: "Transport".into(),
                total: dec!(7.25),
                count: 1,
            },
            CategoryTotal {
                category: "food".into(),
                total: dec!(3.333),
                count: 1,
            },
        ]
    );
    Ok(())
}
