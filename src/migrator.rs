use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_clients_table::Migration),
            Box::new(m20240101_000002_create_devices_table::Migration),
            Box::new(m20240101_000003_create_tickets_table::Migration),
            Box::new(m20240101_000004_create_parts_orders_table::Migration),
            Box::new(m20240101_000005_create_activity_logs_table::Migration),
            Box::new(m20240101_000006_create_repair_notes_table::Migration),
            Box::new(m20240101_000007_create_reminders_table::Migration),
            Box::new(m20240101_000008_create_time_logs_table::Migration),
            Box::new(m20240101_000009_create_attachments_table::Migration),
            Box::new(m20240101_000010_create_billing_tables::Migration),
            Box::new(m20240101_000011_create_sales_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20240101_000001_create_clients_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_clients_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Clients::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Clients::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Clients::Name).string().not_null())
                        .col(ColumnDef::new(Clients::Email).string().null())
                        .col(ColumnDef::new(Clients::Phone).string().null())
                        .col(ColumnDef::new(Clients::Address).string().null())
                        .col(ColumnDef::new(Clients::Notes).text().null())
                        .col(ColumnDef::new(Clients::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Clients::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_clients_name")
                        .table(Clients::Table)
                        .col(Clients::Name)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Clients::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Clients {
        Table,
        Id,
        Name,
        Email,
        Phone,
        Address,
        Notes,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_devices_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_devices_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Devices::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Devices::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Devices::ClientId).uuid().not_null())
                        .col(ColumnDef::new(Devices::DeviceType).string().not_null())
                        .col(ColumnDef::new(Devices::Brand).string().not_null())
                        .col(ColumnDef::new(Devices::Model).string().not_null())
                        .col(ColumnDef::new(Devices::SerialNumber).string().null())
                        .col(ColumnDef::new(Devices::Notes).text().null())
                        .col(ColumnDef::new(Devices::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_devices_client_id")
                        .table(Devices::Table)
                        .col(Devices::ClientId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Devices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Devices {
        Table,
        Id,
        ClientId,
        DeviceType,
        Brand,
        Model,
        SerialNumber,
        Notes,
        CreatedAt,
    }
}

mod m20240101_000003_create_tickets_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_tickets_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Tickets::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Tickets::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Tickets::TicketNumber).string().not_null())
                        .col(ColumnDef::new(Tickets::ClientId).uuid().not_null())
                        .col(ColumnDef::new(Tickets::DeviceId).uuid().not_null())
                        .col(ColumnDef::new(Tickets::Title).string().not_null())
                        .col(ColumnDef::new(Tickets::Description).text().null())
                        .col(ColumnDef::new(Tickets::Status).string().not_null())
                        .col(ColumnDef::new(Tickets::Priority).string().not_null())
                        .col(ColumnDef::new(Tickets::EstimatedCost).decimal().null())
                        .col(ColumnDef::new(Tickets::FinalCost).decimal().null())
                        .col(
                            ColumnDef::new(Tickets::IsPaid)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Tickets::PaymentMethod).string().null())
                        .col(ColumnDef::new(Tickets::PaymentDate).timestamp().null())
                        .col(ColumnDef::new(Tickets::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Tickets::UpdatedAt).timestamp().null())
                        .col(ColumnDef::new(Tickets::CompletedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            // Uniqueness backs the retry-on-conflict path of number generation
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_tickets_ticket_number")
                        .table(Tickets::Table)
                        .col(Tickets::TicketNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_tickets_client_id")
                        .table(Tickets::Table)
                        .col(Tickets::ClientId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_tickets_device_id")
                        .table(Tickets::Table)
                        .col(Tickets::DeviceId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_tickets_status")
                        .table(Tickets::Table)
                        .col(Tickets::Status)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Tickets::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Tickets {
        Table,
        Id,
        TicketNumber,
        ClientId,
        DeviceId,
        Title,
        Description,
        Status,
        Priority,
        EstimatedCost,
        FinalCost,
        IsPaid,
        PaymentMethod,
        PaymentDate,
        CreatedAt,
        UpdatedAt,
        CompletedAt,
    }
}

mod m20240101_000004_create_parts_orders_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_parts_orders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PartsOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PartsOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PartsOrders::TicketId).uuid().not_null())
                        .col(ColumnDef::new(PartsOrders::PartName).string().not_null())
                        .col(ColumnDef::new(PartsOrders::Supplier).string().null())
                        .col(
                            ColumnDef::new(PartsOrders::Cost)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PartsOrders::Quantity)
                                .integer()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(PartsOrders::Status).string().not_null())
                        .col(ColumnDef::new(PartsOrders::OrderDate).timestamp().not_null())
                        .col(ColumnDef::new(PartsOrders::ExpectedDate).timestamp().null())
                        .col(ColumnDef::new(PartsOrders::ReceivedDate).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_parts_orders_ticket_id")
                        .table(PartsOrders::Table)
                        .col(PartsOrders::TicketId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_parts_orders_status")
                        .table(PartsOrders::Table)
                        .col(PartsOrders::Status)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PartsOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum PartsOrders {
        Table,
        Id,
        TicketId,
        PartName,
        Supplier,
        Cost,
        Quantity,
        Status,
        OrderDate,
        ExpectedDate,
        ReceivedDate,
    }
}

mod m20240101_000005_create_activity_logs_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_activity_logs_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ActivityLogs::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ActivityLogs::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ActivityLogs::TicketId).uuid().not_null())
                        .col(ColumnDef::new(ActivityLogs::ActivityType).string().not_null())
                        .col(ColumnDef::new(ActivityLogs::Description).text().not_null())
                        .col(ColumnDef::new(ActivityLogs::Details).text().null())
                        .col(ColumnDef::new(ActivityLogs::PerformedBy).string().null())
                        .col(
                            ColumnDef::new(ActivityLogs::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_activity_logs_ticket_id")
                        .table(ActivityLogs::Table)
                        .col(ActivityLogs::TicketId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ActivityLogs::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum ActivityLogs {
        Table,
        Id,
        TicketId,
        ActivityType,
        Description,
        Details,
        PerformedBy,
        CreatedAt,
    }
}

mod m20240101_000006_create_repair_notes_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_repair_notes_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(RepairNotes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RepairNotes::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RepairNotes::TicketId).uuid().not_null())
                        .col(ColumnDef::new(RepairNotes::CreatedBy).string().not_null())
                        .col(ColumnDef::new(RepairNotes::NoteType).string().not_null())
                        .col(ColumnDef::new(RepairNotes::Priority).string().not_null())
                        .col(ColumnDef::new(RepairNotes::Content).text().not_null())
                        .col(
                            ColumnDef::new(RepairNotes::Resolved)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(RepairNotes::Tags).text().null())
                        .col(ColumnDef::new(RepairNotes::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_repair_notes_ticket_id")
                        .table(RepairNotes::Table)
                        .col(RepairNotes::TicketId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RepairNotes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum RepairNotes {
        Table,
        Id,
        TicketId,
        CreatedBy,
        NoteType,
        Priority,
        Content,
        Resolved,
        Tags,
        CreatedAt,
    }
}

mod m20240101_000007_create_reminders_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_reminders_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Reminders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Reminders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Reminders::TicketId).uuid().null())
                        .col(ColumnDef::new(Reminders::ClientId).uuid().null())
                        .col(ColumnDef::new(Reminders::Title).string().not_null())
                        .col(ColumnDef::new(Reminders::Description).text().null())
                        .col(ColumnDef::new(Reminders::DueDate).timestamp().not_null())
                        .col(
                            ColumnDef::new(Reminders::IsCompleted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Reminders::CompletedAt).timestamp().null())
                        .col(ColumnDef::new(Reminders::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_reminders_due_date")
                        .table(Reminders::Table)
                        .col(Reminders::DueDate)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Reminders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Reminders {
        Table,
        Id,
        TicketId,
        ClientId,
        Title,
        Description,
        DueDate,
        IsCompleted,
        CompletedAt,
        CreatedAt,
    }
}

mod m20240101_000008_create_time_logs_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000008_create_time_logs_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(TimeLogs::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(TimeLogs::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(TimeLogs::TicketId).uuid().not_null())
                        .col(ColumnDef::new(TimeLogs::UserId).string().not_null())
                        .col(ColumnDef::new(TimeLogs::TechnicianName).string().not_null())
                        .col(ColumnDef::new(TimeLogs::StartTime).timestamp().not_null())
                        .col(ColumnDef::new(TimeLogs::EndTime).timestamp().null())
                        .col(ColumnDef::new(TimeLogs::DurationSeconds).big_integer().null())
                        .col(ColumnDef::new(TimeLogs::HourlyRate).decimal().null())
                        .col(ColumnDef::new(TimeLogs::LaborCost).decimal().null())
                        .col(
                            ColumnDef::new(TimeLogs::Billable)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(TimeLogs::Notes).text().null())
                        .col(ColumnDef::new(TimeLogs::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_time_logs_ticket_id")
                        .table(TimeLogs::Table)
                        .col(TimeLogs::TicketId)
                        .to_owned(),
                )
                .await?;

            // Partial unique index enforcing at most one running timer per
            // ticket and technician. sea-query's index builder has no WHERE
            // clause, so this goes through raw SQL (valid on both SQLite and
            // Postgres).
            manager
                .get_connection()
                .execute_unprepared(
                    "CREATE UNIQUE INDEX IF NOT EXISTS idx_time_logs_one_active \
                     ON time_logs (ticket_id, technician_name) WHERE end_time IS NULL",
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(TimeLogs::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum TimeLogs {
        Table,
        Id,
        TicketId,
        UserId,
        TechnicianName,
        StartTime,
        EndTime,
        DurationSeconds,
        HourlyRate,
        LaborCost,
        Billable,
        Notes,
        CreatedAt,
    }
}

mod m20240101_000009_create_attachments_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000009_create_attachments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Attachments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Attachments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Attachments::TicketId).uuid().not_null())
                        .col(ColumnDef::new(Attachments::FileName).string().not_null())
                        .col(ColumnDef::new(Attachments::OriginalName).string().not_null())
                        .col(ColumnDef::new(Attachments::MimeType).string().not_null())
                        .col(
                            ColumnDef::new(Attachments::SizeBytes)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Attachments::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_attachments_ticket_id")
                        .table(Attachments::Table)
                        .col(Attachments::TicketId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Attachments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Attachments {
        Table,
        Id,
        TicketId,
        FileName,
        OriginalName,
        MimeType,
        SizeBytes,
        CreatedAt,
    }
}

mod m20240101_000010_create_billing_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000010_create_billing_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Invoices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Invoices::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Invoices::InvoiceNumber).string().not_null())
                        .col(ColumnDef::new(Invoices::TicketId).uuid().not_null())
                        .col(
                            ColumnDef::new(Invoices::Subtotal)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Invoices::TaxAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Invoices::Total)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Invoices::IssuedAt).timestamp().not_null())
                        .col(ColumnDef::new(Invoices::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoices_invoice_number")
                        .table(Invoices::Table)
                        .col(Invoices::InvoiceNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_invoices_ticket_id")
                        .table(Invoices::Table)
                        .col(Invoices::TicketId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(BillableItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(BillableItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(BillableItems::TicketId).uuid().not_null())
                        .col(ColumnDef::new(BillableItems::InvoiceId).uuid().null())
                        .col(ColumnDef::new(BillableItems::Kind).string().not_null())
                        .col(
                            ColumnDef::new(BillableItems::Description)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BillableItems::Quantity)
                                .decimal()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(BillableItems::UnitPrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(BillableItems::LineTotal)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(BillableItems::TaxRate)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(BillableItems::TaxInclusive)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(BillableItems::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_billable_items_ticket_id")
                        .table(BillableItems::Table)
                        .col(BillableItems::TicketId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_billable_items_invoice_id")
                        .table(BillableItems::Table)
                        .col(BillableItems::InvoiceId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(BillableItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Invoices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Invoices {
        Table,
        Id,
        InvoiceNumber,
        TicketId,
        Subtotal,
        TaxAmount,
        Total,
        IssuedAt,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum BillableItems {
        Table,
        Id,
        TicketId,
        InvoiceId,
        Kind,
        Description,
        Quantity,
        UnitPrice,
        LineTotal,
        TaxRate,
        TaxInclusive,
        CreatedAt,
    }
}

mod m20240101_000011_create_sales_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000011_create_sales_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SalesTransactions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SalesTransactions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalesTransactions::Subtotal)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(SalesTransactions::TaxAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(SalesTransactions::Total)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(SalesTransactions::PaymentMethod)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalesTransactions::CreatedBy)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(SalesTransactions::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SaleItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SaleItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SaleItems::TransactionId).uuid().not_null())
                        .col(ColumnDef::new(SaleItems::Description).string().not_null())
                        .col(
                            ColumnDef::new(SaleItems::Quantity)
                                .decimal()
                                .not_null()
                                .default(1),
                        )
                        .col(
                            ColumnDef::new(SaleItems::UnitPrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(SaleItems::LineTotal)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(SaleItems::TaxRate)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(SaleItems::TaxInclusive)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sale_items_transaction_id")
                        .table(SaleItems::Table)
                        .col(SaleItems::TransactionId)
                        .to_owned(),
                )
                .await?;

            Ok(())
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SaleItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SalesTransactions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum SalesTransactions {
        Table,
        Id,
        Subtotal,
        TaxAmount,
        Total,
        PaymentMethod,
        CreatedBy,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    pub(super) enum SaleItems {
        Table,
        Id,
        TransactionId,
        Description,
        Quantity,
        UnitPrice,
        LineTotal,
        TaxRate,
        TaxInclusive,
    }
}
