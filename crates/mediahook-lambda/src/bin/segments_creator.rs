use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use mediahook_lambda::{handle_video, HandlerState, S3Notification};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let state = HandlerState::bootstrap().await?;
    let pipeline = state.segment_pipeline();
    let pipeline = &pipeline;

    run(service_fn(|event: LambdaEvent<S3Notification>| async move {
        handle_video(pipeline, event.payload, &event.context.request_id)
            .await
            .map_err(Error::from)
    }))
    .await
}
