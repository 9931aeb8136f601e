use std::env;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Bytes, U256};
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use clap::{Arg, Command};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fastlane_searcher::blockchain::{ChainClient, ValidatorMonitor};
use fastlane_searcher::config::Config;
use fastlane_searcher::core::{BuildContext, SubmissionPipeline};
use fastlane_searcher::mev::relay::{BundleRelay, FastLaneClient};
use fastlane_searcher::mocks::MockRelay;
use fastlane_searcher::types::{CycleOutcome, OpportunityTx, RawOpportunity};
use fastlane_searcher::Account;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("fastlane-searcher")
        .version("0.1.0")
        .about("⚡ Polygon FastLane 번들 서쳐 봇")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("설정 파일 경로")
                .default_value("config/default.toml"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("로그 레벨 (trace, debug, info, warn, error)")
                .default_value("info"),
        )
        .arg(
            Arg::new("opportunity")
                .short('o')
                .long("opportunity")
                .value_name("FILE")
                .help("기회 트랜잭션 JSON 파일 (raw, hash, 수수료 필드)")
                .required(true),
        )
        .arg(
            Arg::new("bid")
                .short('b')
                .long("bid")
                .value_name("WEI")
                .help("입찰 금액 (wei 단위, decimal 스케일 없음)")
                .required(true),
        )
        .arg(
            Arg::new("payload")
                .long("payload")
                .value_name("HEX")
                .help("백런 전략 payload (hex, 선택)"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .help("번들을 만들되 릴레이에 제출하지 않음")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = matches.get_one::<String>("log-level").unwrap();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config_path = matches.get_one::<String>("config").unwrap();
    let config = Config::load(config_path).await?;
    info!(
        "⚙️ 설정 로드 완료: chain={} relay={}",
        config.network.name, config.fastlane.relay_url
    );

    // 키는 환경 변수에서만 읽는다. 설정 파일에는 절대 넣지 않는다.
    let private_key = env::var(&config.searcher.private_key_env).with_context(|| {
        format!(
            "환경 변수 {} 에 searcher 키가 없습니다",
            config.searcher.private_key_env
        )
    })?;
    let signer: PrivateKeySigner = private_key
        .trim()
        .parse()
        .context("searcher 키 파싱 실패")?;

    let chain = Arc::new(ChainClient::new(
        config.network.rpc_url.clone(),
        Duration::from_secs(config.network.request_timeout_secs),
    )?);

    let account = Account::connect(chain.as_ref(), signer).await?;
    if account.address() != config.searcher.address {
        warn!(
            "⚠️ 키에서 유도된 주소 {} 가 설정의 {} 와 다릅니다",
            account.address(),
            config.searcher.address
        );
    }

    let opportunity = load_opportunity(matches.get_one::<String>("opportunity").unwrap()).await?;
    let bid_amount: U256 = matches
        .get_one::<String>("bid")
        .unwrap()
        .parse()
        .context("입찰 금액 파싱 실패")?;
    let payload: Bytes = match matches.get_one::<String>("payload") {
        Some(hex_str) => hex::decode(hex_str.trim_start_matches("0x"))
            .context("payload hex 파싱 실패")?
            .into(),
        None => Bytes::new(),
    };

    let monitor = ValidatorMonitor::new(chain.clone(), config.validator_set());
    let context = BuildContext::from_config(&config);

    if matches.get_flag("dry-run") {
        info!("🧪 드라이런 모드 - 릴레이 제출 생략");
        let pipeline = SubmissionPipeline::new(monitor, MockRelay::accepting(), account, context);
        run_cycle(pipeline, &opportunity, bid_amount, payload).await
    } else {
        let api_key = env::var(&config.fastlane.api_key_env).with_context(|| {
            format!(
                "환경 변수 {} 에 릴레이 API 키가 없습니다",
                config.fastlane.api_key_env
            )
        })?;
        let relay = FastLaneClient::new(
            config.fastlane.relay_url.clone(),
            config.fastlane.auth_username.clone(),
            api_key,
            Duration::from_secs(config.fastlane.request_timeout_secs),
        )?;
        let pipeline = SubmissionPipeline::new(monitor, relay, account, context);
        run_cycle(pipeline, &opportunity, bid_amount, payload).await
    }
}

async fn load_opportunity(path: &str) -> Result<OpportunityTx> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("기회 파일을 읽을 수 없습니다: {path}"))?;
    let raw: RawOpportunity =
        serde_json::from_str(&content).context("기회 JSON 파싱 실패")?;
    Ok(OpportunityTx::try_from(raw)?)
}

async fn run_cycle<C, R>(
    mut pipeline: SubmissionPipeline<C, R>,
    opportunity: &OpportunityTx,
    bid_amount: U256,
    payload: Bytes,
) -> Result<()>
where
    C: fastlane_searcher::ChainApi,
    R: BundleRelay,
{
    match pipeline.run_cycle(opportunity, bid_amount, payload).await {
        Ok(CycleOutcome::Submitted { response }) => {
            info!("🎉 릴레이 수락: {}", response.result);
            Ok(())
        }
        Ok(CycleOutcome::Skipped { validator }) => {
            info!("⏭️ 제출 생략 (validator {} 미참여)", validator);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
