//! Read-only analytics queries over an ingested database.
//!
//! These joins span all five tables and never write, so they can be pointed
//! at a database produced by an earlier run.

use crate::error::IngestError;
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use tracing::info;

/// One line of a recent order, joined across all five tables.
#[derive(Debug)]
pub struct OrderLine {
    pub order_id: i64,
    pub order_date: String,
    pub customer_name: String,
    pub product_name: String,
    pub category_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub subtotal: f64,
}

/// Sales totals for one category.
#[derive(Debug)]
pub struct CategorySales {
    pub category_name: String,
    pub total_orders: i64,
    pub total_items_sold: i64,
    pub total_quantity: i64,
    pub total_revenue: f64,
    pub avg_product_price: f64,
}

/// Spending totals for one customer.
#[derive(Debug)]
pub struct CustomerSpending {
    pub customer_id: i64,
    pub customer_name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub order_count: i64,
    pub total_spent: f64,
    pub avg_order_value: f64,
}

/// Order totals grouped by status.
#[derive(Debug)]
pub struct StatusBreakdown {
    pub order_status: String,
    pub order_count: i64,
    pub unique_customers: i64,
    pub total_revenue: f64,
    pub total_shipping_cost: Option<f64>,
}

/// Most recent order lines, joined with customer, product and category.
pub fn recent_order_lines(
    conn: &Connection,
    limit: u32,
) -> Result<Vec<OrderLine>, IngestError> {
    let mut stmt = conn.prepare(
        "SELECT
            o.order_id,
            o.order_date,
            c.first_name || ' ' || c.last_name AS customer_name,
            p.product_name,
            cat.category_name,
            oi.quantity,
            oi.unit_price,
            oi.subtotal
        FROM customers c
        INNER JOIN orders o ON c.customer_id = o.customer_id
        INNER JOIN order_items oi ON o.order_id = oi.order_id
        INNER JOIN products p ON oi.product_id = p.product_id
        INNER JOIN categories cat ON p.category_id = cat.category_id
        ORDER BY o.order_date DESC, c.customer_id
        LIMIT ?1",
    )?;

    let lines = stmt
        .query_map(params![limit], |row| {
            Ok(OrderLine {
                order_id: row.get(0)?,
                order_date: row.get(1)?,
                customer_name: row.get(2)?,
                product_name: row.get(3)?,
                category_name: row.get(4)?,
                quantity: row.get(5)?,
                unit_price: row.get(6)?,
                subtotal: row.get(7)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines)
}

/// Sales summary per category, highest revenue first.
pub fn sales_by_category(conn: &Connection) -> Result<Vec<CategorySales>, IngestError> {
    let mut stmt = conn.prepare(
        "SELECT
            cat.category_name,
            COUNT(DISTINCT o.order_id) AS total_orders,
            COUNT(oi.order_item_id) AS total_items_sold,
            SUM(oi.quantity) AS total_quantity,
            SUM(oi.subtotal) AS total_revenue,
            AVG(oi.unit_price) AS avg_product_price
        FROM categories cat
        INNER JOIN products p ON cat.category_id = p.category_id
        INNER JOIN order_items oi ON p.product_id = oi.product_id
        INNER JOIN orders o ON oi.order_id = o.order_id
        GROUP BY cat.category_id, cat.category_name
        ORDER BY total_revenue DESC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(CategorySales {
                category_name: row.get(0)?,
                total_orders: row.get(1)?,
                total_items_sold: row.get(2)?,
                total_quantity: row.get(3)?,
                total_revenue: row.get(4)?,
                avg_product_price: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Top customers by total spending.
pub fn top_customers(
    conn: &Connection,
    limit: u32,
) -> Result<Vec<CustomerSpending>, IngestError> {
    let mut stmt = conn.prepare(
        "SELECT
            c.customer_id,
            c.first_name || ' ' || c.last_name AS customer_name,
            c.city,
            c.state,
            COUNT(DISTINCT o.order_id) AS order_count,
            SUM(o.total_amount) AS total_spent,
            AVG(o.total_amount) AS avg_order_value
        FROM customers c
        INNER JOIN orders o ON c.customer_id = o.customer_id
        GROUP BY c.customer_id, c.first_name, c.last_name, c.city, c.state
        ORDER BY total_spent DESC
        LIMIT ?1",
    )?;

    let rows = stmt
        .query_map(params![limit], |row| {
            Ok(CustomerSpending {
                customer_id: row.get(0)?,
                customer_name: row.get(1)?,
                city: row.get(2)?,
                state: row.get(3)?,
                order_count: row.get(4)?,
                total_spent: row.get(5)?,
                avg_order_value: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Order counts and revenue grouped by order status.
pub fn status_breakdown(conn: &Connection) -> Result<Vec<StatusBreakdown>, IngestError> {
    let mut stmt = conn.prepare(
        "SELECT
            o.order_status,
            COUNT(DISTINCT o.order_id) AS order_count,
            COUNT(DISTINCT o.customer_id) AS unique_customers,
            SUM(o.total_amount) AS total_revenue,
            SUM(o.shipping_cost) AS total_shipping_cost
        FROM orders o
        GROUP BY o.order_status
        ORDER BY order_count DESC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(StatusBreakdown {
                order_status: row.get(0)?,
                order_count: row.get(1)?,
                unique_customers: row.get(2)?,
                total_revenue: row.get(3)?,
                total_shipping_cost: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Run all report queries against an existing database and log the results.
pub fn run_report(db_file: &Path, limit: u32) -> Result<(), IngestError> {
    if !db_file.exists() {
        return Err(IngestError::MissingDatabase(db_file.to_path_buf()));
    }

    let conn = Connection::open_with_flags(db_file, OpenFlags::SQLITE_OPEN_READ_ONLY)?;

    info!("Recent order lines:");
    for line in recent_order_lines(&conn, limit)? {
        info!(
            "  order {} ({}) {}: {} x{} @ {:.2} = {:.2} [{}]",
            line.order_id,
            line.order_date,
            line.customer_name,
            line.product_name,
            line.quantity,
            line.unit_price,
            line.subtotal,
            line.category_name
        );
    }

    info!("Sales by category:");
    for sales in sales_by_category(&conn)? {
        info!(
            "  {}: {} orders, {} items, {} units, revenue {:.2}, avg price {:.2}",
            sales.category_name,
            sales.total_orders,
            sales.total_items_sold,
            sales.total_quantity,
            sales.total_revenue,
            sales.avg_product_price
        );
    }

    info!("Top customers by spending:");
    for customer in top_customers(&conn, limit)? {
        info!(
            "  #{} {}: {} orders, spent {:.2} (avg {:.2})",
            customer.customer_id,
            customer.customer_name,
            customer.order_count,
            customer.total_spent,
            customer.avg_order_value
        );
    }

    info!("Order status breakdown:");
    for status in status_breakdown(&conn)? {
        info!(
            "  {}: {} orders from {} customers, revenue {:.2}, shipping {:.2}",
            status.order_status,
            status.order_count,
            status.unique_customers,
            status.total_revenue,
            status.total_shipping_cost.unwrap_or(0.0)
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::init_schema;

    fn fixture_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO categories (category_id, category_name) VALUES (1, 'Electronics');
             INSERT INTO categories (category_id, category_name) VALUES (2, 'Books');
             INSERT INTO customers (customer_id, first_name, last_name, email, city, state)
                 VALUES (1, 'Alice', 'Smith', 'alice@example.com', 'Springfield', 'IL');
             INSERT INTO customers (customer_id, first_name, last_name, email, city, state)
                 VALUES (2, 'Bob', 'Jones', 'bob@example.com', 'Portland', 'OR');
             INSERT INTO products (product_id, product_name, category_id, price)
                 VALUES (1, 'Laptop', 1, 999.0);
             INSERT INTO products (product_id, product_name, category_id, price)
                 VALUES (2, 'Novel', 2, 15.0);
             INSERT INTO orders (order_id, customer_id, order_date, order_status, total_amount, shipping_cost)
                 VALUES (1001, 1, '2024-01-05', 'shipped', 1014.0, 10.0);
             INSERT INTO orders (order_id, customer_id, order_date, order_status, total_amount, shipping_cost)
                 VALUES (1002, 2, '2024-01-06', 'pending', 15.0, 5.0);
             INSERT INTO order_items (order_item_id, order_id, product_id, quantity, unit_price, subtotal)
                 VALUES (1, 1001, 1, 1, 999.0, 999.0);
             INSERT INTO order_items (order_item_id, order_id, product_id, quantity, unit_price, subtotal)
                 VALUES (2, 1001, 2, 1, 15.0, 15.0);
             INSERT INTO order_items (order_item_id, order_id, product_id, quantity, unit_price, subtotal)
                 VALUES (3, 1002, 2, 1, 15.0, 15.0);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn test_sales_by_category_orders_by_revenue() {
        let conn = fixture_conn();
        let sales = sales_by_category(&conn).unwrap();

        assert_eq!(sales.len(), 2);
        assert_eq!(sales[0].category_name, "Electronics");
        assert_eq!(sales[0].total_revenue, 999.0);
        assert_eq!(sales[1].category_name, "Books");
        assert_eq!(sales[1].total_items_sold, 2);
        assert_eq!(sales[1].total_revenue, 30.0);
    }

    #[test]
    fn test_top_customers() {
        let conn = fixture_conn();
        let customers = top_customers(&conn, 10).unwrap();

        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].customer_name, "Alice Smith");
        assert_eq!(customers[0].order_count, 1);
        assert_eq!(customers[0].total_spent, 1014.0);
    }

    #[test]
    fn test_top_customers_respects_limit() {
        let conn = fixture_conn();
        let customers = top_customers(&conn, 1).unwrap();
        assert_eq!(customers.len(), 1);
    }

    #[test]
    fn test_status_breakdown() {
        let conn = fixture_conn();
        let statuses = status_breakdown(&conn).unwrap();

        assert_eq!(statuses.len(), 2);
        let shipped = statuses
            .iter()
            .find(|s| s.order_status == "shipped")
            .unwrap();
        assert_eq!(shipped.order_count, 1);
        assert_eq!(shipped.unique_customers, 1);
        assert_eq!(shipped.total_shipping_cost, Some(10.0));
    }

    #[test]
    fn test_recent_order_lines_newest_first() {
        let conn = fixture_conn();
        let lines = recent_order_lines(&conn, 10).unwrap();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].order_id, 1002);
        assert_eq!(lines[0].customer_name, "Bob Jones");
    }

    #[test]
    fn test_run_report_missing_database() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.db");

        let result = run_report(&missing, 10);
        assert!(matches!(result, Err(IngestError::MissingDatabase(_))));
    }
}
