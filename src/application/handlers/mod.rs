//! Application command and query handlers.

pub mod order;
pub mod payment;

#[cfg(test)]
pub(crate) mod test_support {
    //! In-memory port implementations shared by handler tests.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::domain::foundation::{CourseId, DomainError, ErrorCode, OrderId, UserId};
    use crate::domain::order::{Course, Order, PaymentStatus};
    use crate::domain::payment::ProviderEvent;
    use crate::ports::{CourseCatalog, OrderStore, UserDirectory, UserRecord};

    /// In-memory order store mirroring the Postgres adapter's contract.
    pub struct InMemoryOrderStore {
        orders: Mutex<Vec<Order>>,
    }

    impl InMemoryOrderStore {
        pub fn new() -> Self {
            Self {
                orders: Mutex::new(Vec::new()),
            }
        }

        pub fn with_order(order: Order) -> Self {
            Self {
                orders: Mutex::new(vec![order]),
            }
        }

        pub fn orders(&self) -> Vec<Order> {
            self.orders.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl OrderStore for InMemoryOrderStore {
        async fn insert(&self, order: &Order) -> Result<(), DomainError> {
            let mut orders = self.orders.lock().unwrap();
            let duplicate_success = order.status == PaymentStatus::Success
                && orders.iter().any(|o| {
                    o.user_id == order.user_id
                        && o.course.id == order.course.id
                        && o.status == PaymentStatus::Success
                });
            if duplicate_success {
                return Err(DomainError::new(
                    ErrorCode::AlreadyPurchased,
                    "You have already purchased this course",
                ));
            }
            orders.push(order.clone());
            Ok(())
        }

        async fn update(&self, order: &Order) -> Result<(), DomainError> {
            let mut orders = self.orders.lock().unwrap();
            // The partial unique index guards updates as well as inserts.
            let duplicate_success = order.status == PaymentStatus::Success
                && orders.iter().any(|o| {
                    o.id != order.id
                        && o.user_id == order.user_id
                        && o.course.id == order.course.id
                        && o.status == PaymentStatus::Success
                });
            if duplicate_success {
                return Err(DomainError::new(
                    ErrorCode::AlreadyPurchased,
                    "You have already purchased this course",
                ));
            }
            match orders.iter_mut().find(|o| o.id == order.id) {
                Some(existing) => {
                    *existing = order.clone();
                    Ok(())
                }
                None => Err(DomainError::new(ErrorCode::OrderNotFound, "Order not found")),
            }
        }

        async fn find_by_id(&self, id: &OrderId) -> Result<Option<Order>, DomainError> {
            let orders = self.orders.lock().unwrap();
            Ok(orders.iter().find(|o| &o.id == id).cloned())
        }

        async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Order>, DomainError> {
            let orders = self.orders.lock().unwrap();
            Ok(orders
                .iter()
                .filter(|o| &o.user_id == user_id)
                .cloned()
                .collect())
        }

        async fn find_all(&self) -> Result<Vec<Order>, DomainError> {
            Ok(self.orders.lock().unwrap().clone())
        }

        async fn exists_successful_order(
            &self,
            user_id: &UserId,
            course_id: &CourseId,
        ) -> Result<bool, DomainError> {
            let orders = self.orders.lock().unwrap();
            Ok(orders.iter().any(|o| {
                &o.user_id == user_id
                    && &o.course.id == course_id
                    && o.status == PaymentStatus::Success
            }))
        }
    }

    /// User directory backed by a fixed set of records.
    pub struct StaticUserDirectory {
        users: Vec<UserRecord>,
    }

    impl StaticUserDirectory {
        pub fn with_users(users: Vec<UserRecord>) -> Self {
            Self { users }
        }

        pub fn single(id: &str, email: &str) -> Self {
            Self::with_users(vec![UserRecord {
                id: UserId::new(id).unwrap(),
                email: email.to_string(),
            }])
        }
    }

    #[async_trait]
    impl UserDirectory for StaticUserDirectory {
        async fn find_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, DomainError> {
            Ok(self.users.iter().find(|u| &u.id == id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DomainError> {
            Ok(self.users.iter().find(|u| u.email == email).cloned())
        }
    }

    /// Course catalog backed by a fixed set of courses.
    pub struct StaticCourseCatalog {
        courses: Vec<Course>,
    }

    impl StaticCourseCatalog {
        pub fn with_courses(courses: Vec<Course>) -> Self {
            Self { courses }
        }
    }

    #[async_trait]
    impl CourseCatalog for StaticCourseCatalog {
        async fn find_by_id(&self, id: &CourseId) -> Result<Option<Course>, DomainError> {
            Ok(self.courses.iter().find(|c| &c.id == id).cloned())
        }
    }

    /// Builds a course priced 49.99 in minor units.
    pub fn course_4999(id: CourseId) -> Course {
        Course::new(
            id,
            "Systems Programming in Rust",
            "Memory, concurrency, and I/O",
            4999,
            "https://cdn.example.com/rust/content",
            "https://cdn.example.com/rust/cover.png",
        )
        .unwrap()
    }

    /// Builds a provider event bound to an order.
    pub fn payment_event(
        kind: &str,
        payment_id: &str,
        order_id: Option<OrderId>,
    ) -> ProviderEvent {
        let mut metadata = HashMap::new();
        if let Some(id) = order_id {
            metadata.insert("orderId".to_string(), id.to_string());
        }
        ProviderEvent {
            id: format!("evt_{}", payment_id),
            kind: crate::domain::payment::ProviderEventKind::parse(kind),
            payment_id: Some(payment_id.to_string()),
            metadata,
            created: 1704067200,
        }
    }
}
