//! Table definitions for the e-commerce schema.
//!
//! The five tables are declared in foreign-key dependency order: creation
//! and loading iterate the list forwards, drops iterate it backwards, so a
//! foreign key always points at a table that still (or already) exists.

use crate::error::IngestError;
use rusqlite::Connection;
use tracing::info;

/// A target table together with the CSV file it is populated from.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    /// Table name in the database.
    pub name: &'static str,
    /// CSV file the loader reads, relative to the data directory.
    pub source_file: &'static str,
    /// CREATE TABLE statement.
    create_sql: &'static str,
}

/// All tables in load order (parents before children).
pub const TABLES: [TableSpec; 5] = [
    TableSpec {
        name: "categories",
        source_file: "categories.csv",
        create_sql: "CREATE TABLE categories (
            category_id INTEGER PRIMARY KEY,
            category_name TEXT NOT NULL,
            description TEXT,
            parent_category_id INTEGER,
            FOREIGN KEY (parent_category_id) REFERENCES categories(category_id)
        )",
    },
    TableSpec {
        name: "customers",
        source_file: "customers.csv",
        create_sql: "CREATE TABLE customers (
            customer_id INTEGER PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            phone TEXT,
            address TEXT,
            city TEXT,
            state TEXT,
            zip_code TEXT,
            country TEXT,
            registration_date TEXT
        )",
    },
    TableSpec {
        name: "products",
        source_file: "products.csv",
        create_sql: "CREATE TABLE products (
            product_id INTEGER PRIMARY KEY,
            product_name TEXT NOT NULL,
            category_id INTEGER,
            price REAL NOT NULL,
            stock_quantity INTEGER,
            description TEXT,
            brand TEXT,
            sku TEXT,
            created_date TEXT,
            FOREIGN KEY (category_id) REFERENCES categories(category_id)
        )",
    },
    TableSpec {
        name: "orders",
        source_file: "orders.csv",
        create_sql: "CREATE TABLE orders (
            order_id INTEGER PRIMARY KEY,
            customer_id INTEGER NOT NULL,
            order_date TEXT NOT NULL,
            order_status TEXT NOT NULL,
            total_amount REAL NOT NULL,
            shipping_address TEXT,
            shipping_city TEXT,
            shipping_state TEXT,
            shipping_zip TEXT,
            payment_method TEXT,
            shipping_cost REAL,
            FOREIGN KEY (customer_id) REFERENCES customers(customer_id)
        )",
    },
    TableSpec {
        name: "order_items",
        source_file: "order_items.csv",
        create_sql: "CREATE TABLE order_items (
            order_item_id INTEGER PRIMARY KEY,
            order_id INTEGER NOT NULL,
            product_id INTEGER NOT NULL,
            quantity INTEGER NOT NULL,
            unit_price REAL NOT NULL,
            subtotal REAL NOT NULL,
            FOREIGN KEY (order_id) REFERENCES orders(order_id),
            FOREIGN KEY (product_id) REFERENCES products(product_id)
        )",
    },
];

/// Drop any existing tables and recreate them from scratch.
///
/// Destructive: all data from a previous run is discarded. Failure here is
/// fatal for the run.
pub fn init_schema(conn: &Connection) -> Result<(), IngestError> {
    for table in TABLES.iter().rev() {
        conn.execute(&format!("DROP TABLE IF EXISTS {}", table.name), [])?;
    }
    for table in &TABLES {
        conn.execute(table.create_sql, [])?;
    }
    info!("Created {} tables", TABLES.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_names(conn: &Connection) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")
            .unwrap();
        stmt.query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<String>, _>>()
            .unwrap()
    }

    #[test]
    fn test_init_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        assert_eq!(
            table_names(&conn),
            vec![
                "categories",
                "customers",
                "order_items",
                "orders",
                "products"
            ]
        );
    }

    #[test]
    fn test_reinit_discards_prior_data() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO categories (category_id, category_name) VALUES (1, 'Electronics')",
            [],
        )
        .unwrap();

        init_schema(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM categories", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_email_unique_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        conn.execute(
            "INSERT INTO customers (customer_id, first_name, last_name, email)
             VALUES (1, 'Alice', 'Smith', 'alice@example.com')",
            [],
        )
        .unwrap();

        let dup = conn.execute(
            "INSERT INTO customers (customer_id, first_name, last_name, email)
             VALUES (2, 'Bob', 'Jones', 'alice@example.com')",
            [],
        );
        assert!(dup.is_err());
    }
}
