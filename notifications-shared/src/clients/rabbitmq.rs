use lapin::{
    options::*,
    types::{AMQPValue, FieldTable, LongString},
    Channel, Connection, ConnectionProperties, Consumer, ExchangeKind,
};

/// Exchange/queue/binding a consumer drains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueTopology {
    pub exchange: String,
    pub queue: String,
    pub routing_key: String,
    pub prefetch_count: u16,
    pub dead_letter_exchange: Option<String>,
}

impl QueueTopology {
    pub fn queue_arguments(&self) -> FieldTable {
        let mut args = FieldTable::default();
        if let Some(dlx) = &self.dead_letter_exchange {
            args.insert(
                "x-dead-letter-exchange".into(),
                AMQPValue::LongString(LongString::from(dlx.clone())),
            );
        }
        args
    }
}

#[derive(Clone)]
pub struct RabbitMQClient {
    connection: std::sync::Arc<Connection>,
    channel: Channel,
}

impl RabbitMQClient {
    pub async fn connect(url: &str) -> Result<Self, lapin::Error> {
        let conn = Connection::connect(url, ConnectionProperties::default()).await?;
        let channel = conn.create_channel().await?;

        tracing::info!("connected to RabbitMQ");
        Ok(Self {
            connection: std::sync::Arc::new(conn),
            channel,
        })
    }

    /// Declare the durable direct exchange and queue, bind them, and cap the
    /// number of unacknowledged deliveries held by this channel.
    pub async fn declare(&self, topology: &QueueTopology) -> Result<(), lapin::Error> {
        self.channel
            .exchange_declare(
                &topology.exchange,
                ExchangeKind::Direct,
                ExchangeDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;

        self.channel
            .queue_declare(
                &topology.queue,
                QueueDeclareOptions {
                    durable: true,
                    ..Default::default()
                },
                topology.queue_arguments(),
            )
            .await?;

        self.channel
            .queue_bind(
                &topology.queue,
                &topology.exchange,
                &topology.routing_key,
                QueueBindOptions::default(),
                FieldTable::default(),
            )
            .await?;

        self.channel
            .basic_qos(topology.prefetch_count, BasicQosOptions::default())
            .await?;

        tracing::info!(
            exchange = %topology.exchange,
            queue = %topology.queue,
            routing_key = %topology.routing_key,
            prefetch = topology.prefetch_count,
            "declared RabbitMQ topology"
        );

        Ok(())
    }

    /// Start consuming. With `auto_ack` the broker considers every delivery
    /// settled as soon as it is sent.
    pub async fn consume(
        &self,
        queue_name: &str,
        consumer_tag: &str,
        auto_ack: bool,
    ) -> Result<Consumer, lapin::Error> {
        let consumer = self
            .channel
            .basic_consume(
                queue_name,
                consumer_tag,
                BasicConsumeOptions {
                    no_ack: auto_ack,
                    ..Default::default()
                },
                FieldTable::default(),
            )
            .await?;

        tracing::info!(
            queue = %queue_name,
            consumer_tag = %consumer_tag,
            auto_ack,
            "subscribed to RabbitMQ queue"
        );

        Ok(consumer)
    }

    pub fn is_connected(&self) -> bool {
        self.connection.status().connected()
    }
}
